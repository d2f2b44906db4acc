// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Timestamps in responses are RFC 3339 strings in UTC.

use serde::{Deserialize, Serialize};

/// API request to create a new decree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDecreeRequest {
    /// The decree title.
    pub title: String,
    /// The authoring seat.
    pub author_seat: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional category.
    pub category: Option<String>,
}

/// API request to cast a vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastVoteRequest {
    /// The voting seat.
    pub seat_id: String,
    /// `yes`, `no` or `abstain`.
    pub choice: String,
}

/// API request to force a decree's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceStatusRequest {
    /// The target status.
    pub status: String,
}

/// API request to edit a decree.
///
/// Only fields that are present are changed. An empty description or
/// category clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDecreeRequest {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// Set the content expiry this many days from now.
    pub expiry_days: Option<u32>,
    /// Remove the content expiry.
    pub clear_expiry: bool,
}

/// API request to delete a draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteDecreeRequest {
    /// Must be true for the draft to be deleted.
    pub confirm: bool,
}

/// API request to list decrees. Filters combine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDecreesRequest {
    /// Only decrees with this status.
    pub status: Option<String>,
    /// Only decrees in this category, compared case-insensitively.
    pub category: Option<String>,
    /// Only decrees authored by this seat.
    pub author: Option<String>,
}

/// API request for a page of the history log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRequest {
    /// Page number starting at 1. Out-of-range values are clamped.
    pub page: Option<usize>,
    /// `newest` (default) or `oldest`.
    pub order: Option<String>,
}

/// Vote counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyInfo {
    pub yes: u32,
    pub no: u32,
    pub abstain: u32,
    /// Votes cast, abstentions included.
    pub cast: u32,
}

/// One recorded vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteInfo {
    pub seat_id: String,
    pub choice: String,
}

/// Full view of a decree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecreeInfo {
    pub decree_id: i64,
    pub status: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_by: String,
    pub voting_opened_at: Option<String>,
    pub voting_closes_at: Option<String>,
    pub expires_at: Option<String>,
    /// Votes in seat order.
    pub votes: Vec<VoteInfo>,
    pub tally: TallyInfo,
}

/// API response for operations that return a single decree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecreeResponse {
    /// The decree after the operation.
    pub decree: DecreeInfo,
    /// A success message.
    pub message: String,
}

/// What the evaluation after a vote decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationInfo {
    /// `not_voting`, `pending`, `finalized` or `blocked`.
    pub outcome: String,
    /// The terminal status reached or refused.
    pub status: Option<String>,
    /// Why the decree closed.
    pub reason: Option<String>,
    /// Votes required for quorum, while pending.
    pub quorum_required: Option<u32>,
    /// Whether quorum is met, while pending.
    pub quorum_met: Option<bool>,
}

/// API response for a cast vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastVoteResponse {
    /// The decree after the vote.
    pub decree: DecreeInfo,
    /// The seat's previous vote, if it was replaced.
    pub replaced: Option<String>,
    /// The evaluation that followed the vote.
    pub evaluation: EvaluationInfo,
    /// Active seats still missing a vote when the vote was cast.
    pub missing_seats: Vec<String>,
    /// A success message.
    pub message: String,
}

/// API response for a delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteDecreeResponse {
    pub decree_id: i64,
    pub title: String,
    /// False when the request was not confirmed and nothing changed.
    pub deleted: bool,
    pub message: String,
}

/// API response for listing decrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDecreesResponse {
    /// Matching decrees in id order.
    pub decrees: Vec<DecreeInfo>,
}

/// Who forced a decree closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorInfo {
    pub id: String,
    pub actor_type: String,
}

/// One history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntryInfo {
    pub decree_id: i64,
    pub final_status: String,
    pub title: String,
    pub yes: u32,
    pub no: u32,
    pub abstain: u32,
    pub total_votes: u32,
    pub quorum_required: u32,
    pub quorum_met: bool,
    pub closed_at: String,
    pub reason: String,
    pub closed_by: Option<ActorInfo>,
}

/// API response for a page of history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPageResponse {
    pub entries: Vec<HistoryEntryInfo>,
    pub page: usize,
    pub total_pages: usize,
    pub total_entries: usize,
}

/// A decree finalized by a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepFinalizedInfo {
    pub decree_id: i64,
    pub status: String,
}

/// A decree a sweep could not finalize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepFailureInfo {
    pub decree_id: i64,
    pub message: String,
}

/// API response for a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResponse {
    pub examined: usize,
    pub skipped: usize,
    pub finalized: Vec<SweepFinalizedInfo>,
    pub failures: Vec<SweepFailureInfo>,
}

/// The voting rules in force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesResponse {
    pub majority_mode: String,
    pub min_quorum_percent: u8,
    pub ties_pass: bool,
    pub voting_duration_minutes: u32,
}

/// Authoring and voting figures for one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatStatsInfo {
    pub seat_id: String,
    pub display_name: String,
    pub created_total: u32,
    pub created_enacted: u32,
    pub created_rejected: u32,
    pub created_other: u32,
    /// `None` when the seat authored nothing.
    pub enacted_percent: Option<u32>,
    pub rejected_percent: Option<u32>,
    pub votes: TallyInfo,
}

/// Figures for every seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatStatsResponse {
    pub seats: Vec<SeatStatsInfo>,
}
