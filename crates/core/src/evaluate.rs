// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The single evaluation routine shared by the vote-cast path and the
//! periodic sweep.

use decrees_domain::{
    ClosureReason, Decree, DecreeStatus, Resolution, Tally, VotingRules, resolve,
};
use time::OffsetDateTime;

/// What an evaluation decided for one decree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The decree is not in `Voting`; nothing to decide.
    NotVoting,
    /// Still open. Carries the computation for reporting.
    Undecided(Resolution),
    /// The decree must move to `target`.
    Resolve {
        target: DecreeStatus,
        reason: ClosureReason,
        resolution: Resolution,
    },
}

/// Evaluates a decree against the rules at `now`.
///
/// Pure: the same decree, rules, seat count and time always give the same
/// verdict.
///
/// # Arguments
///
/// * `decree` - The decree, with any newly cast vote already recorded
/// * `rules` - The rules in force for this evaluation
/// * `active_seats` - Number of occupied seats
/// * `now` - The evaluation time
#[must_use]
pub fn evaluate(
    decree: &Decree,
    rules: &VotingRules,
    active_seats: u32,
    now: OffsetDateTime,
) -> Verdict {
    if decree.status() != DecreeStatus::Voting {
        return Verdict::NotVoting;
    }

    let tally: Tally = decree.tally();
    let time_expired: bool = decree.is_voting_expired(rules, now);
    let resolution: Resolution = resolve(&tally, rules, active_seats, time_expired);

    match (resolution.outcome.target_status(), resolution.reason) {
        (Some(target), Some(reason)) => Verdict::Resolve {
            target,
            reason,
            resolution,
        },
        _ => Verdict::Undecided(resolution),
    }
}
