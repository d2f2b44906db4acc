// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::status::DecreeStatus;
use crate::types::{DecreeId, SeatId};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The requested status change is not permitted by the decree lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: DecreeStatus,
        /// The requested status.
        to: DecreeStatus,
        /// Why the transition was refused.
        reason: String,
    },
    /// A vote was cast on a decree that is not accepting votes.
    NotVotingPhase {
        /// The decree.
        decree_id: DecreeId,
        /// The decree's current status.
        status: DecreeStatus,
    },
    /// The operation is only permitted while the decree is a draft.
    NotDraft {
        /// The decree.
        decree_id: DecreeId,
        /// The decree's current status.
        status: DecreeStatus,
    },
    /// The decree has reached a terminal status and can no longer be edited.
    DecreeFinalized {
        /// The decree.
        decree_id: DecreeId,
        /// The decree's terminal status.
        status: DecreeStatus,
    },
    /// The seat is unknown or currently has no holder.
    SeatNotActive(SeatId),
    /// Decree title is empty or invalid.
    InvalidTitle(String),
    /// Quorum percent is outside 0..=100.
    InvalidQuorumPercent(u8),
    /// Failed to parse a decree status.
    InvalidStatus(String),
    /// Failed to parse a vote choice.
    InvalidVoteChoice(String),
    /// Failed to parse a majority mode.
    InvalidMajorityMode(String),
    /// Failed to parse a closure reason.
    InvalidClosureReason(String),
    /// A stored decree violates the record invariants.
    InconsistentRecord {
        /// The decree.
        decree_id: DecreeId,
        /// Description of the violated invariant.
        reason: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid status transition {from} -> {to}: {reason}")
            }
            Self::NotVotingPhase { decree_id, status } => {
                write!(
                    f,
                    "Decree {decree_id} is not open for voting (status: {status})"
                )
            }
            Self::NotDraft { decree_id, status } => {
                write!(
                    f,
                    "Decree {decree_id} must be in draft for this operation (status: {status})"
                )
            }
            Self::DecreeFinalized { decree_id, status } => {
                write!(
                    f,
                    "Decree {decree_id} is {status} and can no longer be modified"
                )
            }
            Self::SeatNotActive(seat) => {
                write!(f, "Seat '{seat}' is not an active council seat")
            }
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidQuorumPercent(percent) => {
                write!(
                    f,
                    "Invalid quorum percent: {percent}. Must be between 0 and 100"
                )
            }
            Self::InvalidStatus(s) => write!(f, "Invalid decree status: '{s}'"),
            Self::InvalidVoteChoice(s) => write!(f, "Invalid vote choice: '{s}'"),
            Self::InvalidMajorityMode(s) => write!(f, "Invalid majority mode: '{s}'"),
            Self::InvalidClosureReason(s) => write!(f, "Invalid closure reason: '{s}'"),
            Self::InconsistentRecord { decree_id, reason } => {
                write!(f, "Stored decree {decree_id} is inconsistent: {reason}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
