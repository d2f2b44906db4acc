// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the council decrees engine.
//!
//! Request types here are plain values; the transport decodes into them.
//! Response types serialize with serde. Errors from the engine are
//! translated into [`ApiError`] so that domain and storage details never
//! reach callers unfiltered.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_history_error,
};
pub use handlers::{
    cast_vote, create_decree, delete_decree, edit_decree, force_status, get_decree, get_history,
    get_rules, get_seat_stats, get_seat_stats_for, list_decrees, open_decree, run_sweep,
    sweep_to_response,
};
pub use request_response::{
    ActorInfo, CastVoteRequest, CastVoteResponse, CreateDecreeRequest, DecreeInfo,
    DecreeResponse, DeleteDecreeRequest, DeleteDecreeResponse, EditDecreeRequest,
    EvaluationInfo, ForceStatusRequest, HistoryEntryInfo, HistoryPageResponse, HistoryRequest,
    ListDecreesRequest, ListDecreesResponse, RulesResponse, SeatStatsInfo, SeatStatsResponse,
    SweepFailureInfo, SweepFinalizedInfo, SweepResponse, TallyInfo, VoteInfo,
};
