// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{SeatId, VoteChoice};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vote counts for a decree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    /// Yes votes.
    pub yes: u32,
    /// No votes.
    pub no: u32,
    /// Abstentions.
    pub abstain: u32,
}

impl Tally {
    /// Counts the votes in a seat-keyed vote map.
    #[must_use]
    pub fn from_votes(votes: &BTreeMap<SeatId, VoteChoice>) -> Self {
        votes.values().fold(Self::default(), |mut tally, choice| {
            match choice {
                VoteChoice::Yes => tally.yes += 1,
                VoteChoice::No => tally.no += 1,
                VoteChoice::Abstain => tally.abstain += 1,
            }
            tally
        })
    }

    /// Total votes cast, abstentions included.
    #[must_use]
    pub const fn cast(&self) -> u32 {
        self.yes + self.no + self.abstain
    }
}
