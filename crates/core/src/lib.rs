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

mod backend;
mod collaborators;
mod council;
mod error;
mod evaluate;
mod notification;
mod stats;
mod store;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use backend::{DecreeBackend, MemoryBackend, MemoryBackendError, PersistedState, StoreWrite};
pub use collaborators::{
    Clock, Collaborators, CouncilRoster, NotificationSink, RulesProvider, SeatRoster, SharedRules,
    SystemClock, TracingNotifier,
};
pub use council::{Council, DecreeEdit, Evaluation, ExpiryChange, SweepReport, VoteReceipt};
pub use error::CoreError;
pub use evaluate::{Verdict, evaluate};
pub use notification::Notification;
pub use stats::{SeatStats, seat_stats};
pub use store::DecreeStore;
