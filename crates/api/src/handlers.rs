// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions.
//!
//! Each handler checks authorization, translates the request into domain
//! types, calls the engine, and translates the result back. Handlers never
//! touch storage directly; every write goes through the engine.

use decrees::{
    CoreError, Council, DecreeBackend, DecreeEdit, Evaluation, ExpiryChange, SeatStats,
    SweepReport, VoteReceipt,
};
use decrees_audit::{HistoryEntry, HistoryOrder, HistoryPage};
use decrees_domain::{
    Decree, DecreeId, DecreeStatus, DomainError, SeatId, Tally, VoteChoice, VotingRules,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    ActorInfo, CastVoteRequest, CastVoteResponse, CreateDecreeRequest, DecreeInfo,
    DecreeResponse, DeleteDecreeRequest, DeleteDecreeResponse, EditDecreeRequest,
    EvaluationInfo, ForceStatusRequest, HistoryEntryInfo, HistoryPageResponse, HistoryRequest,
    ListDecreesRequest, ListDecreesResponse, RulesResponse, SeatStatsInfo, SeatStatsResponse,
    SweepFailureInfo, SweepFinalizedInfo, SweepResponse, TallyInfo, VoteInfo,
};

/// Creates a draft decree.
///
/// # Arguments
///
/// * `council` - The decree engine
/// * `request` - The decree to create
/// * `actor` - The actor performing this action
///
/// # Errors
///
/// Returns an error if:
/// - The authoring seat is not active
/// - The title is blank
/// - The decree cannot be stored
pub fn create_decree<B: DecreeBackend>(
    council: &mut Council<B>,
    request: CreateDecreeRequest,
    actor: &AuthenticatedActor,
) -> Result<DecreeResponse, ApiError> {
    info!(
        actor_id = %actor.id,
        author_seat = %request.author_seat,
        "Creating decree"
    );

    let author: SeatId = SeatId::new(&request.author_seat);
    let decree: Decree = council
        .create_decree_with(
            &request.title,
            &author,
            request.description,
            request.category,
        )
        .map_err(translate_core_error)?;

    Ok(DecreeResponse {
        message: format!("Created decree {}", decree.id()),
        decree: decree_to_info(&decree)?,
    })
}

/// Opens a draft for voting.
///
/// # Errors
///
/// Returns an error if the decree does not exist, is not a draft, or
/// cannot be stored.
pub fn open_decree<B: DecreeBackend>(
    council: &mut Council<B>,
    decree_id: i64,
    actor: &AuthenticatedActor,
) -> Result<DecreeResponse, ApiError> {
    info!(actor_id = %actor.id, decree_id, "Opening decree for voting");

    let decree: Decree = council
        .open_for_voting(DecreeId::new(decree_id))
        .map_err(translate_core_error)?;

    Ok(DecreeResponse {
        message: format!("Opened decree {} for voting", decree.id()),
        decree: decree_to_info(&decree)?,
    })
}

/// Casts or replaces a seat's vote.
///
/// The decree is evaluated straight after the vote and may be finalized
/// by it.
///
/// # Errors
///
/// Returns an error if:
/// - The choice is not `yes`, `no` or `abstain`
/// - The seat is not active
/// - The decree does not exist or is not open for voting
/// - The vote cannot be stored
pub fn cast_vote<B: DecreeBackend>(
    council: &mut Council<B>,
    decree_id: i64,
    request: CastVoteRequest,
    actor: &AuthenticatedActor,
) -> Result<CastVoteResponse, ApiError> {
    info!(
        actor_id = %actor.id,
        decree_id,
        seat_id = %request.seat_id,
        "Casting vote"
    );

    let choice: VoteChoice = request.choice.parse().map_err(translate_domain_error)?;
    let seat: SeatId = SeatId::new(&request.seat_id);
    let receipt: VoteReceipt = council
        .cast_vote(DecreeId::new(decree_id), &seat, choice)
        .map_err(translate_core_error)?;

    let message: String = match receipt.evaluation {
        Evaluation::Finalized { status, .. } => {
            format!("Vote recorded; decree {} is now {status}", receipt.decree.id())
        }
        _ => format!("Vote recorded on decree {}", receipt.decree.id()),
    };

    Ok(CastVoteResponse {
        decree: decree_to_info(&receipt.decree)?,
        replaced: receipt.replaced.map(|c| c.as_str().to_string()),
        evaluation: evaluation_to_info(&receipt.evaluation),
        missing_seats: receipt
            .missing_seats
            .iter()
            .map(|seat| seat.value().to_string())
            .collect(),
        message,
    })
}

/// Forces a decree's status without evaluating the votes.
///
/// The lifecycle rules still apply. Forcing a terminal status writes a
/// history entry attributed to the actor.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The status is unknown
/// - The transition is not a legal lifecycle edge
/// - The decree cannot be stored
pub fn force_status<B: DecreeBackend>(
    council: &mut Council<B>,
    decree_id: i64,
    request: ForceStatusRequest,
    actor: &AuthenticatedActor,
) -> Result<DecreeResponse, ApiError> {
    AuthorizationService::authorize_force_status(actor)?;
    info!(
        actor_id = %actor.id,
        decree_id,
        status = %request.status,
        "Forcing decree status"
    );

    let target: DecreeStatus = request.status.parse().map_err(translate_domain_error)?;
    let decree: Decree = council
        .force_status(DecreeId::new(decree_id), target, &actor.to_audit_actor())
        .map_err(translate_core_error)?;

    Ok(DecreeResponse {
        message: format!("Decree {} forced to {target}", decree.id()),
        decree: decree_to_info(&decree)?,
    })
}

/// Edits a decree that has not been finalized.
///
/// # Errors
///
/// Returns an error if:
/// - The request changes nothing, or both sets and clears the expiry
/// - The decree does not exist or is finalized
/// - The new title is blank
/// - The decree cannot be stored
pub fn edit_decree<B: DecreeBackend>(
    council: &mut Council<B>,
    decree_id: i64,
    request: EditDecreeRequest,
    actor: &AuthenticatedActor,
) -> Result<DecreeResponse, ApiError> {
    info!(actor_id = %actor.id, decree_id, "Editing decree");

    if request.expiry_days.is_some() && request.clear_expiry {
        return Err(ApiError::InvalidInput {
            field: String::from("expiry_days"),
            message: String::from("Cannot set and clear the expiry in one request"),
        });
    }

    let edit: DecreeEdit = DecreeEdit {
        title: request.title,
        description: request.description,
        category: request.category,
        expiry: if request.clear_expiry {
            Some(ExpiryChange::Clear)
        } else {
            request.expiry_days.map(ExpiryChange::InDays)
        },
    };
    if edit.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("request"),
            message: String::from("No changes requested"),
        });
    }

    let decree: Decree = council
        .edit_decree(DecreeId::new(decree_id), edit)
        .map_err(|err| match err {
            CoreError::DomainViolation(DomainError::DateArithmeticOverflow { .. }) => {
                ApiError::InvalidInput {
                    field: String::from("expiry_days"),
                    message: err.to_string(),
                }
            }
            other => translate_core_error(other),
        })?;

    Ok(DecreeResponse {
        message: format!("Updated decree {}", decree.id()),
        decree: decree_to_info(&decree)?,
    })
}

/// Deletes a draft.
///
/// Without `confirm` nothing is deleted; the response describes what
/// would be removed.
///
/// # Errors
///
/// Returns an error if the decree does not exist, is not a draft, or the
/// deletion cannot be stored.
pub fn delete_decree<B: DecreeBackend>(
    council: &mut Council<B>,
    decree_id: i64,
    request: DeleteDecreeRequest,
    actor: &AuthenticatedActor,
) -> Result<DeleteDecreeResponse, ApiError> {
    info!(
        actor_id = %actor.id,
        decree_id,
        confirm = request.confirm,
        "Deleting decree"
    );

    let id: DecreeId = DecreeId::new(decree_id);
    let decree: Decree = council.get_decree(id).map_err(translate_core_error)?;
    if decree.status() != DecreeStatus::Draft {
        return Err(translate_domain_error(
            DomainError::NotDraft {
                decree_id: id,
                status: decree.status(),
            },
        ));
    }

    if !request.confirm {
        return Ok(DeleteDecreeResponse {
            decree_id,
            title: decree.title().to_string(),
            deleted: false,
            message: format!(
                "Decree {id} '{}' would be deleted; repeat with confirm to proceed",
                decree.title()
            ),
        });
    }

    let removed: Decree = council.delete_draft(id).map_err(translate_core_error)?;
    Ok(DeleteDecreeResponse {
        decree_id,
        title: removed.title().to_string(),
        deleted: true,
        message: format!("Deleted decree {id}"),
    })
}

/// Returns one decree.
///
/// # Errors
///
/// Returns an error if the decree does not exist.
pub fn get_decree<B: DecreeBackend>(
    council: &Council<B>,
    decree_id: i64,
) -> Result<DecreeInfo, ApiError> {
    let decree: Decree = council
        .get_decree(DecreeId::new(decree_id))
        .map_err(translate_core_error)?;
    decree_to_info(&decree)
}

/// Lists decrees matching every given filter, in id order.
///
/// # Errors
///
/// Returns an error if the status filter is unknown.
pub fn list_decrees<B: DecreeBackend>(
    council: &Council<B>,
    request: &ListDecreesRequest,
) -> Result<ListDecreesResponse, ApiError> {
    let status: Option<DecreeStatus> = request
        .status
        .as_deref()
        .map(str::parse::<DecreeStatus>)
        .transpose()
        .map_err(translate_domain_error)?;
    let author: Option<SeatId> = request.author.as_deref().map(SeatId::new);

    let mut decrees: Vec<Decree> = match (&request.category, &author) {
        (Some(category), _) => council.list_by_category(category),
        (None, Some(author)) => council.list_by_author(author),
        (None, None) => council.list_by_status(status),
    };
    decrees.retain(|decree| {
        status.is_none_or(|s| decree.status() == s)
            && author.as_ref().is_none_or(|a| decree.created_by() == a)
    });

    Ok(ListDecreesResponse {
        decrees: decrees
            .iter()
            .map(decree_to_info)
            .collect::<Result<Vec<DecreeInfo>, ApiError>>()?,
    })
}

/// Returns a page of the history log.
///
/// # Errors
///
/// Returns an error if the order is not `newest` or `oldest`.
pub fn get_history<B: DecreeBackend>(
    council: &Council<B>,
    request: &HistoryRequest,
) -> Result<HistoryPageResponse, ApiError> {
    let order: HistoryOrder = match request.order.as_deref().map(str::trim) {
        None | Some("" | "newest") => HistoryOrder::NewestFirst,
        Some("oldest") => HistoryOrder::OldestFirst,
        Some(other) => {
            return Err(ApiError::InvalidInput {
                field: String::from("order"),
                message: format!("Unknown history order '{other}'; use 'newest' or 'oldest'"),
            });
        }
    };

    let page: HistoryPage = council.history_page(request.page.unwrap_or(1), order);
    Ok(HistoryPageResponse {
        entries: page
            .entries
            .iter()
            .map(history_entry_to_info)
            .collect::<Result<Vec<HistoryEntryInfo>, ApiError>>()?,
        page: page.page,
        total_pages: page.total_pages,
        total_entries: page.total_entries,
    })
}

/// Runs the periodic sweep immediately.
///
/// # Errors
///
/// Returns an error if the actor is not an admin.
pub fn run_sweep<B: DecreeBackend>(
    council: &mut Council<B>,
    actor: &AuthenticatedActor,
) -> Result<SweepResponse, ApiError> {
    AuthorizationService::authorize_sweep(actor)?;
    info!(actor_id = %actor.id, "Running sweep on request");

    Ok(sweep_to_response(&council.sweep()))
}

/// Returns the voting rules in force.
#[must_use]
pub fn get_rules<B: DecreeBackend>(council: &Council<B>) -> RulesResponse {
    let rules: VotingRules = council.current_rules();
    RulesResponse {
        majority_mode: rules.majority_mode.as_str().to_string(),
        min_quorum_percent: rules.min_quorum_percent,
        ties_pass: rules.ties_pass,
        voting_duration_minutes: rules.voting_duration_minutes,
    }
}

/// Authoring and voting figures for every seat, declared seats first.
#[must_use]
pub fn get_seat_stats<B: DecreeBackend>(council: &Council<B>) -> SeatStatsResponse {
    SeatStatsResponse {
        seats: council.seat_stats().iter().map(seat_stats_to_info).collect(),
    }
}

/// Figures for one seat.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the seat is neither declared nor seen on
/// any decree.
pub fn get_seat_stats_for<B: DecreeBackend>(
    council: &Council<B>,
    seat_id: &str,
) -> Result<SeatStatsInfo, ApiError> {
    let seat: SeatId = SeatId::new(seat_id);
    council
        .seat_stats_for(&seat)
        .map(|stats| seat_stats_to_info(&stats))
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Seat"),
            message: format!("Seat '{seat}' has no record"),
        })
}

/// Converts a sweep report into its response form.
#[must_use]
pub fn sweep_to_response(report: &SweepReport) -> SweepResponse {
    SweepResponse {
        examined: report.examined,
        skipped: report.skipped,
        finalized: report
            .finalized
            .iter()
            .map(|(id, status)| SweepFinalizedInfo {
                decree_id: id.value(),
                status: status.as_str().to_string(),
            })
            .collect(),
        failures: report
            .failures
            .iter()
            .map(|(id, err)| SweepFailureInfo {
                decree_id: id.value(),
                message: err.to_string(),
            })
            .collect(),
    }
}

fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn format_optional(value: Option<OffsetDateTime>) -> Result<Option<String>, ApiError> {
    value.map(format_timestamp).transpose()
}

fn tally_to_info(tally: Tally) -> TallyInfo {
    TallyInfo {
        yes: tally.yes,
        no: tally.no,
        abstain: tally.abstain,
        cast: tally.cast(),
    }
}

fn seat_stats_to_info(stats: &SeatStats) -> SeatStatsInfo {
    SeatStatsInfo {
        seat_id: stats.seat_id.value().to_string(),
        display_name: stats.display_name.clone(),
        created_total: stats.created_total,
        created_enacted: stats.created_enacted,
        created_rejected: stats.created_rejected,
        created_other: stats.created_other,
        enacted_percent: stats.enacted_percent(),
        rejected_percent: stats.rejected_percent(),
        votes: tally_to_info(stats.votes),
    }
}

fn decree_to_info(decree: &Decree) -> Result<DecreeInfo, ApiError> {
    Ok(DecreeInfo {
        decree_id: decree.id().value(),
        status: decree.status().as_str().to_string(),
        title: decree.title().to_string(),
        description: decree.description().map(str::to_string),
        category: decree.category().map(str::to_string),
        created_by: decree.created_by().value().to_string(),
        voting_opened_at: format_optional(decree.voting_opened_at())?,
        voting_closes_at: format_optional(decree.voting_closes_at())?,
        expires_at: format_optional(decree.expires_at())?,
        votes: decree
            .votes()
            .iter()
            .map(|(seat, choice)| VoteInfo {
                seat_id: seat.value().to_string(),
                choice: choice.as_str().to_string(),
            })
            .collect(),
        tally: tally_to_info(decree.tally()),
    })
}

fn evaluation_to_info(evaluation: &Evaluation) -> EvaluationInfo {
    match evaluation {
        Evaluation::NotVoting => EvaluationInfo {
            outcome: String::from("not_voting"),
            status: None,
            reason: None,
            quorum_required: None,
            quorum_met: None,
        },
        Evaluation::Pending(resolution) => EvaluationInfo {
            outcome: String::from("pending"),
            status: None,
            reason: None,
            quorum_required: Some(resolution.quorum_required),
            quorum_met: Some(resolution.quorum_met),
        },
        Evaluation::Finalized { status, reason } => EvaluationInfo {
            outcome: String::from("finalized"),
            status: Some(status.as_str().to_string()),
            reason: Some(reason.as_str().to_string()),
            quorum_required: None,
            quorum_met: None,
        },
        Evaluation::Blocked { target } => EvaluationInfo {
            outcome: String::from("blocked"),
            status: Some(target.as_str().to_string()),
            reason: None,
            quorum_required: None,
            quorum_met: None,
        },
    }
}

fn history_entry_to_info(entry: &HistoryEntry) -> Result<HistoryEntryInfo, ApiError> {
    Ok(HistoryEntryInfo {
        decree_id: entry.decree_id.value(),
        final_status: entry.final_status.as_str().to_string(),
        title: entry.title.clone(),
        yes: entry.tally.yes,
        no: entry.tally.no,
        abstain: entry.tally.abstain,
        total_votes: entry.total_votes,
        quorum_required: entry.quorum_required,
        quorum_met: entry.quorum_met,
        closed_at: format_timestamp(entry.closed_at)?,
        reason: entry.reason.as_str().to_string(),
        closed_by: entry.closed_by.as_ref().map(|actor| ActorInfo {
            id: actor.id.clone(),
            actor_type: actor.actor_type.clone(),
        }),
    })
}
