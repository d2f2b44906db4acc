// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Decree status tracking and transition logic.
//!
//! Legal edges:
//! - `Draft` → `Voting`
//! - `Draft` → `Enacted` | `Rejected` | `Cancelled` (administrative override)
//! - `Voting` → `Enacted` | `Rejected` | `Cancelled`
//!
//! Terminal states accept no transitions, including a transition to themselves.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of a decree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecreeStatus {
    /// Being authored. Editable and deletable.
    #[default]
    Draft,
    /// Open for seat votes.
    Voting,
    /// Passed.
    Enacted,
    /// Failed, either by vote or by timeout without quorum.
    Rejected,
    /// Withdrawn or voided.
    Cancelled,
}

impl DecreeStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Voting,
        Self::Enacted,
        Self::Rejected,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Voting => "voting",
            Self::Enacted => "enacted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Enacted | Self::Rejected | Self::Cancelled)
    }

    /// Checks if a transition from this status to `target` is a legal edge.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Draft,
                Self::Voting | Self::Enacted | Self::Rejected | Self::Cancelled
            ) | (Self::Voting, Self::Enacted | Self::Rejected | Self::Cancelled)
        )
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is
    /// redundant, leaves a terminal status, or is not a legal edge.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if *self == target {
            return Err(DomainError::InvalidStatusTransition {
                from: *self,
                to: target,
                reason: String::from("redundant transition to the current status"),
            });
        }

        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: *self,
                to: target,
                reason: String::from("cannot transition from terminal state"),
            });
        }

        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: *self,
                to: target,
                reason: String::from("transition not permitted by decree lifecycle rules"),
            })
        }
    }
}

impl FromStr for DecreeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "voting" => Ok(Self::Voting),
            "enacted" => Ok(Self::Enacted),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for DecreeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        for status in DecreeStatus::ALL {
            let s = status.as_str();
            match s.parse::<DecreeStatus>() {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("VOTING".parse::<DecreeStatus>(), Ok(DecreeStatus::Voting));
        assert_eq!(" Enacted ".parse::<DecreeStatus>(), Ok(DecreeStatus::Enacted));
    }

    #[test]
    fn test_invalid_status_string() {
        assert!(matches!(
            "pending".parse::<DecreeStatus>(),
            Err(DomainError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!DecreeStatus::Draft.is_terminal());
        assert!(!DecreeStatus::Voting.is_terminal());
        assert!(DecreeStatus::Enacted.is_terminal());
        assert!(DecreeStatus::Rejected.is_terminal());
        assert!(DecreeStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_valid_transitions_from_draft() {
        let current = DecreeStatus::Draft;

        assert!(current.validate_transition(DecreeStatus::Voting).is_ok());
        assert!(current.validate_transition(DecreeStatus::Enacted).is_ok());
        assert!(current.validate_transition(DecreeStatus::Rejected).is_ok());
        assert!(current.validate_transition(DecreeStatus::Cancelled).is_ok());
    }

    #[test]
    fn test_valid_transitions_from_voting() {
        let current = DecreeStatus::Voting;

        assert!(current.validate_transition(DecreeStatus::Enacted).is_ok());
        assert!(current.validate_transition(DecreeStatus::Rejected).is_ok());
        assert!(current.validate_transition(DecreeStatus::Cancelled).is_ok());
    }

    #[test]
    fn test_voting_cannot_return_to_draft() {
        let result = DecreeStatus::Voting.validate_transition(DecreeStatus::Draft);

        assert!(matches!(
            result,
            Err(DomainError::InvalidStatusTransition {
                from: DecreeStatus::Voting,
                to: DecreeStatus::Draft,
                ..
            })
        ));
    }

    #[test]
    fn test_no_transitions_from_terminal_states() {
        for terminal in [
            DecreeStatus::Enacted,
            DecreeStatus::Rejected,
            DecreeStatus::Cancelled,
        ] {
            for target in DecreeStatus::ALL {
                assert!(
                    terminal.validate_transition(target).is_err(),
                    "{terminal} -> {target} should be refused"
                );
            }
        }
    }

    #[test]
    fn test_self_transition_is_refused() {
        for status in DecreeStatus::ALL {
            assert!(status.validate_transition(status).is_err());
        }
    }

    #[test]
    fn test_can_transition_to_matches_validate_transition() {
        for from in DecreeStatus::ALL {
            for to in DecreeStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    from.validate_transition(to).is_ok(),
                    "{from} -> {to}"
                );
            }
        }
    }
}
