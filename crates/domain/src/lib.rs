// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod decree;
mod error;
mod resolution;
mod rules;
mod status;
mod tally;
mod types;

#[cfg(test)]
mod tests;

// Re-export public types
pub use decree::{Decree, StoredDecree};
pub use error::DomainError;
pub use resolution::{ClosureReason, Outcome, Resolution, quorum_required, resolve};
pub use rules::{MajorityMode, VotingRules};
pub use status::DecreeStatus;
pub use tally::Tally;
pub use types::{DecreeId, Seat, SeatId, VoteChoice};
