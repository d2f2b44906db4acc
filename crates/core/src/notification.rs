// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use decrees_domain::{ClosureReason, DecreeId, DecreeStatus, SeatId, VoteChoice};
use time::OffsetDateTime;

/// Events emitted by the engine for the notification collaborator.
///
/// Notifications are side signals. Delivery never affects decree state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A decree was opened for voting.
    VotingOpened {
        decree_id: DecreeId,
        title: String,
        closes_at: Option<OffsetDateTime>,
    },
    /// A seat voted. `replaced` holds the seat's earlier vote, if any.
    VoteCast {
        decree_id: DecreeId,
        seat: SeatId,
        choice: VoteChoice,
        replaced: Option<VoteChoice>,
    },
    /// Exactly one active seat has yet to vote.
    OneVoteRemaining {
        decree_id: DecreeId,
        missing_seat: SeatId,
    },
    /// A decree reached a terminal status.
    Finalized {
        decree_id: DecreeId,
        status: DecreeStatus,
        reason: ClosureReason,
    },
}

impl Notification {
    /// The decree this notification is about.
    #[must_use]
    pub const fn decree_id(&self) -> DecreeId {
        match self {
            Self::VotingOpened { decree_id, .. }
            | Self::VoteCast { decree_id, .. }
            | Self::OneVoteRemaining { decree_id, .. }
            | Self::Finalized { decree_id, .. } => *decree_id,
        }
    }
}
