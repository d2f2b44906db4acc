// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Quorum and majority resolution.
//!
//! Everything in this module is pure. The vote-cast path and the periodic
//! sweep both call [`resolve`], so identical inputs always produce the
//! identical outcome no matter which trigger runs first.

use crate::error::DomainError;
use crate::rules::VotingRules;
use crate::status::DecreeStatus;
use crate::tally::Tally;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of votes required for quorum.
///
/// - no active seats, or a quorum percent of 0: no quorum (0)
/// - 100% or more: every active seat
/// - otherwise `ceil(active_seats * percent / 100)`
#[must_use]
pub fn quorum_required(active_seats: u32, min_quorum_percent: u8) -> u32 {
    if active_seats == 0 || min_quorum_percent == 0 {
        return 0;
    }
    if min_quorum_percent >= 100 {
        return active_seats;
    }
    let required: u64 = (u64::from(active_seats) * u64::from(min_quorum_percent)).div_ceil(100);
    u32::try_from(required).unwrap_or(active_seats)
}

/// Result of resolving a tally against the voting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Not resolvable yet; the decree stays in `Voting`.
    Undecided,
    /// The decree passes.
    Enacted,
    /// The decree fails.
    Rejected,
}

impl Outcome {
    /// The terminal status this outcome resolves to, if any.
    #[must_use]
    pub const fn target_status(&self) -> Option<DecreeStatus> {
        match self {
            Self::Undecided => None,
            Self::Enacted => Some(DecreeStatus::Enacted),
            Self::Rejected => Some(DecreeStatus::Rejected),
        }
    }
}

/// Why a decree reached its terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureReason {
    /// Every active seat voted and quorum was met.
    AllVotesReceived,
    /// The voting period ended with quorum met.
    VotingExpired,
    /// The voting period ended without quorum.
    VotingExpiredWithoutQuorum,
    /// An operator forced the status.
    Forced,
}

impl ClosureReason {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AllVotesReceived => "all_votes_received",
            Self::VotingExpired => "voting_expired",
            Self::VotingExpiredWithoutQuorum => "voting_expired_without_quorum",
            Self::Forced => "forced",
        }
    }
}

impl FromStr for ClosureReason {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all_votes_received" => Ok(Self::AllVotesReceived),
            "voting_expired" => Ok(Self::VotingExpired),
            "voting_expired_without_quorum" => Ok(Self::VotingExpiredWithoutQuorum),
            "forced" => Ok(Self::Forced),
            _ => Err(DomainError::InvalidClosureReason(s.to_string())),
        }
    }
}

impl std::fmt::Display for ClosureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full quorum and majority computation for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Votes needed for quorum.
    pub quorum_required: u32,
    /// Whether the votes cast reach quorum.
    pub quorum_met: bool,
    /// Whether every active seat has voted.
    pub all_voted: bool,
    /// Whether the voting period has ended.
    pub time_expired: bool,
    /// The resolved outcome.
    pub outcome: Outcome,
    /// Why the decree closes. `None` while undecided.
    pub reason: Option<ClosureReason>,
}

/// Resolves a tally against the voting rules.
///
/// # Arguments
///
/// * `tally` - The current vote counts
/// * `rules` - The voting rules in force
/// * `active_seats` - Number of currently occupied seats
/// * `time_expired` - Whether the voting period has ended
#[must_use]
pub fn resolve(
    tally: &Tally,
    rules: &VotingRules,
    active_seats: u32,
    time_expired: bool,
) -> Resolution {
    let cast: u32 = tally.cast();
    let quorum_required: u32 = quorum_required(active_seats, rules.min_quorum_percent);
    let quorum_met: bool = cast >= quorum_required;
    let all_voted: bool = active_seats > 0 && cast == active_seats;

    let (outcome, reason): (Outcome, Option<ClosureReason>) = if quorum_met
        && (all_voted || time_expired)
    {
        let reason = if time_expired {
            ClosureReason::VotingExpired
        } else {
            ClosureReason::AllVotesReceived
        };
        (majority_outcome(tally, rules), Some(reason))
    } else if time_expired && !quorum_met {
        (
            Outcome::Rejected,
            Some(ClosureReason::VotingExpiredWithoutQuorum),
        )
    } else {
        (Outcome::Undecided, None)
    };

    Resolution {
        quorum_required,
        quorum_met,
        all_voted,
        time_expired,
        outcome,
        reason,
    }
}

/// Applies the majority and tie rules to a tally that has met quorum.
fn majority_outcome(tally: &Tally, rules: &VotingRules) -> Outcome {
    let cast: u32 = tally.cast();
    if cast == 0 {
        return Outcome::Rejected;
    }

    let required_yes: u32 = rules.majority_mode.required_yes(cast);
    if tally.yes > tally.no && tally.yes >= required_yes {
        Outcome::Enacted
    } else if tally.yes == tally.no {
        if rules.ties_pass {
            Outcome::Enacted
        } else {
            Outcome::Rejected
        }
    } else {
        Outcome::Rejected
    }
}
