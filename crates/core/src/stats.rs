// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-seat activity figures.
//!
//! Declared seats come first in declaration order, followed by any seat
//! that authored or voted on a decree but is no longer declared.

use decrees_domain::{Decree, DecreeStatus, Seat, SeatId, Tally, VoteChoice};
use std::collections::HashMap;

/// Authoring and voting figures for one seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatStats {
    pub seat_id: SeatId,
    /// The declared display name, or the seat id for undeclared seats.
    pub display_name: String,
    pub created_total: u32,
    pub created_enacted: u32,
    pub created_rejected: u32,
    /// Authored decrees that are drafts, in voting, or cancelled.
    pub created_other: u32,
    /// Votes this seat currently holds across every decree.
    pub votes: Tally,
}

impl SeatStats {
    fn new(seat_id: SeatId, display_name: String) -> Self {
        Self {
            seat_id,
            display_name,
            created_total: 0,
            created_enacted: 0,
            created_rejected: 0,
            created_other: 0,
            votes: Tally::default(),
        }
    }

    /// Share of authored decrees that were enacted, rounded to the nearest
    /// whole percent. `None` when the seat authored nothing.
    #[must_use]
    pub fn enacted_percent(&self) -> Option<u32> {
        rounded_percent(self.created_enacted, self.created_total)
    }

    /// Share of authored decrees that were rejected, rounded to the nearest
    /// whole percent. `None` when the seat authored nothing.
    #[must_use]
    pub fn rejected_percent(&self) -> Option<u32> {
        rounded_percent(self.created_rejected, self.created_total)
    }
}

fn rounded_percent(part: u32, total: u32) -> Option<u32> {
    if total == 0 {
        return None;
    }
    let scaled: u64 = (u64::from(part) * 200 + u64::from(total)) / (2 * u64::from(total));
    u32::try_from(scaled).ok()
}

/// Builds the figures for every declared seat and every seat seen on a decree.
#[must_use]
pub fn seat_stats<'a, I>(declared: &[Seat], decrees: I) -> Vec<SeatStats>
where
    I: IntoIterator<Item = &'a Decree>,
{
    let mut stats: Vec<SeatStats> = declared
        .iter()
        .map(|seat| SeatStats::new(seat.id.clone(), seat.display_name.clone()))
        .collect();
    let mut index: HashMap<SeatId, usize> = stats
        .iter()
        .enumerate()
        .map(|(position, entry)| (entry.seat_id.clone(), position))
        .collect();

    let mut entry_for = |seat: &SeatId, stats: &mut Vec<SeatStats>| -> usize {
        *index.entry(seat.clone()).or_insert_with(|| {
            stats.push(SeatStats::new(seat.clone(), seat.value().to_string()));
            stats.len() - 1
        })
    };

    for decree in decrees {
        let author: usize = entry_for(decree.created_by(), &mut stats);
        let authored: &mut SeatStats = &mut stats[author];
        authored.created_total += 1;
        match decree.status() {
            DecreeStatus::Enacted => authored.created_enacted += 1,
            DecreeStatus::Rejected => authored.created_rejected += 1,
            DecreeStatus::Draft | DecreeStatus::Voting | DecreeStatus::Cancelled => {
                authored.created_other += 1;
            }
        }

        for (seat, choice) in decree.votes() {
            let voter: usize = entry_for(seat, &mut stats);
            let votes: &mut Tally = &mut stats[voter].votes;
            match choice {
                VoteChoice::Yes => votes.yes += 1,
                VoteChoice::No => votes.no += 1,
                VoteChoice::Abstain => votes.abstain += 1,
            }
        }
    }

    stats
}
