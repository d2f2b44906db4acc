// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Numeric identifier of a decree.
///
/// Identifiers are allocated monotonically by the decree store starting at 1
/// and are never reused, even after a draft is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecreeId(i64);

impl DecreeId {
    /// Creates a decree identifier from its raw value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for DecreeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable identifier of a council seat (e.g. `overseer_regent`).
///
/// Seat identifiers are case-sensitive and compared verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(String);

impl SeatId {
    /// Creates a seat identifier.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named voting slot on the council.
///
/// A seat is active while it has a holder. Unoccupied seats never count
/// toward quorum or majority denominators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    /// The seat identifier.
    pub id: SeatId,
    /// Human readable name used in notifications.
    #[serde(alias = "display_name")]
    pub display_name: String,
    /// The current holder, if any.
    #[serde(default, alias = "holderName")]
    pub holder: Option<String>,
}

impl Seat {
    /// Creates a seat.
    ///
    /// # Arguments
    ///
    /// * `id` - The seat identifier
    /// * `display_name` - The display name
    /// * `holder` - The current holder, or `None` for a vacant seat
    #[must_use]
    pub fn new(id: &str, display_name: &str, holder: Option<&str>) -> Self {
        Self {
            id: SeatId::new(id),
            display_name: display_name.to_string(),
            holder: holder.map(str::to_string),
        }
    }

    /// Returns true if the seat currently has a holder.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.holder.is_some()
    }
}

/// A seat's vote on a decree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    /// In favour.
    Yes,
    /// Against.
    No,
    /// Present but not voting either way. Counts toward quorum.
    Abstain,
}

impl VoteChoice {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Abstain => "abstain",
        }
    }
}

impl FromStr for VoteChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            "abstain" => Ok(Self::Abstain),
            _ => Err(DomainError::InvalidVoteChoice(s.to_string())),
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
