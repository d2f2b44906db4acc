// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The decree entity.
//!
//! A decree owns its votes. Every mutation goes through a method that checks
//! the lifecycle invariants, so a decree that has reached a terminal status
//! can no longer change in any way.

use crate::error::DomainError;
use crate::rules::VotingRules;
use crate::status::DecreeStatus;
use crate::tally::Tally;
use crate::types::{DecreeId, SeatId, VoteChoice};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// A proposal moving from `Draft` through `Voting` to a terminal status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decree {
    id: DecreeId,
    status: DecreeStatus,
    title: String,
    description: Option<String>,
    category: Option<String>,
    created_by: SeatId,
    voting_opened_at: Option<OffsetDateTime>,
    voting_closes_at: Option<OffsetDateTime>,
    expires_at: Option<OffsetDateTime>,
    votes: BTreeMap<SeatId, VoteChoice>,
}

/// Plain field-by-field representation of a decree.
///
/// Used to move decrees in and out of durable storage. Converting back into
/// a [`Decree`] re-checks the record invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDecree {
    pub id: DecreeId,
    pub status: DecreeStatus,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_by: SeatId,
    pub voting_opened_at: Option<OffsetDateTime>,
    pub voting_closes_at: Option<OffsetDateTime>,
    pub expires_at: Option<OffsetDateTime>,
    pub votes: BTreeMap<SeatId, VoteChoice>,
}

impl Decree {
    /// Creates a new draft decree.
    ///
    /// # Arguments
    ///
    /// * `id` - The identifier allocated by the store
    /// * `title` - The decree title
    /// * `created_by` - The authoring seat
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTitle` if the title is blank.
    pub fn new(id: DecreeId, title: &str, created_by: SeatId) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            status: DecreeStatus::Draft,
            title: validate_title(title)?,
            description: None,
            category: None,
            created_by,
            voting_opened_at: None,
            voting_closes_at: None,
            expires_at: None,
            votes: BTreeMap::new(),
        })
    }

    #[must_use]
    pub const fn id(&self) -> DecreeId {
        self.id
    }

    #[must_use]
    pub const fn status(&self) -> DecreeStatus {
        self.status
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub const fn created_by(&self) -> &SeatId {
        &self.created_by
    }

    #[must_use]
    pub const fn voting_opened_at(&self) -> Option<OffsetDateTime> {
        self.voting_opened_at
    }

    #[must_use]
    pub const fn voting_closes_at(&self) -> Option<OffsetDateTime> {
        self.voting_closes_at
    }

    #[must_use]
    pub const fn expires_at(&self) -> Option<OffsetDateTime> {
        self.expires_at
    }

    /// Read-only view of the recorded votes.
    #[must_use]
    pub const fn votes(&self) -> &BTreeMap<SeatId, VoteChoice> {
        &self.votes
    }

    /// Counts the recorded votes.
    #[must_use]
    pub fn tally(&self) -> Tally {
        Tally::from_votes(&self.votes)
    }

    /// Opens the decree for voting.
    ///
    /// Sets `voting_opened_at` to `now` and, when the rules carry a voting
    /// duration, fixes `voting_closes_at` at `now + duration`. The deadline is
    /// never recomputed afterwards, even if the rules change.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The decree is not a draft
    /// - The deadline cannot be represented
    pub fn open_voting(&mut self, now: OffsetDateTime, rules: &VotingRules) -> Result<(), DomainError> {
        if self.status != DecreeStatus::Draft {
            return Err(DomainError::NotDraft {
                decree_id: self.id,
                status: self.status,
            });
        }
        self.status.validate_transition(DecreeStatus::Voting)?;

        let closes_at: Option<OffsetDateTime> = match rules.voting_duration() {
            Some(duration) => Some(now.checked_add(duration).ok_or_else(|| {
                DomainError::DateArithmeticOverflow {
                    operation: format!("computing voting deadline for decree {}", self.id),
                }
            })?),
            None => None,
        };

        self.voting_opened_at = Some(now);
        self.voting_closes_at = closes_at;
        self.status = DecreeStatus::Voting;
        Ok(())
    }

    /// Records a seat's vote, replacing any earlier vote by the same seat.
    ///
    /// Returns the seat's previous vote, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotVotingPhase` if the decree is not in `Voting`.
    pub fn record_vote(
        &mut self,
        seat: SeatId,
        choice: VoteChoice,
    ) -> Result<Option<VoteChoice>, DomainError> {
        if self.status != DecreeStatus::Voting {
            return Err(DomainError::NotVotingPhase {
                decree_id: self.id,
                status: self.status,
            });
        }
        Ok(self.votes.insert(seat, choice))
    }

    /// Moves the decree to a terminal status.
    ///
    /// Returns the status the decree held before the transition.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is not
    /// a legal lifecycle edge. `Voting` is only reachable through
    /// [`Decree::open_voting`], which also fixes the voting window.
    pub fn transition_to(&mut self, target: DecreeStatus) -> Result<DecreeStatus, DomainError> {
        self.status.validate_transition(target)?;
        if target == DecreeStatus::Voting {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: target,
                reason: String::from("voting must be opened with a voting window"),
            });
        }

        let previous: DecreeStatus = self.status;
        self.status = target;
        Ok(previous)
    }

    /// The instant voting ends, if the decree has a deadline.
    ///
    /// A stored `voting_closes_at` always wins. Records written before the
    /// deadline was stored fall back to `voting_opened_at` plus the current
    /// voting duration.
    #[must_use]
    pub fn voting_deadline(&self, rules: &VotingRules) -> Option<OffsetDateTime> {
        if let Some(closes_at) = self.voting_closes_at {
            return Some(closes_at);
        }
        let opened_at: OffsetDateTime = self.voting_opened_at?;
        let duration = rules.voting_duration()?;
        opened_at.checked_add(duration)
    }

    /// Whether the voting period has ended at `now`.
    #[must_use]
    pub fn is_voting_expired(&self, rules: &VotingRules, now: OffsetDateTime) -> bool {
        self.voting_deadline(rules)
            .is_some_and(|deadline| now >= deadline)
    }

    /// Active seats that have not voted yet, in the order given.
    #[must_use]
    pub fn seats_missing_vote<'a, I>(&self, active_seats: I) -> Vec<SeatId>
    where
        I: IntoIterator<Item = &'a SeatId>,
    {
        active_seats
            .into_iter()
            .filter(|seat| !self.votes.contains_key(*seat))
            .cloned()
            .collect()
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns an error if the decree is terminal or the title is blank.
    pub fn set_title(&mut self, title: &str) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.title = validate_title(title)?;
        Ok(())
    }

    /// Replaces or clears the description.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DecreeFinalized` if the decree is terminal.
    pub fn set_description(&mut self, description: Option<String>) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.description = description.filter(|d| !d.trim().is_empty());
        Ok(())
    }

    /// Replaces or clears the category.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DecreeFinalized` if the decree is terminal.
    pub fn set_category(&mut self, category: Option<String>) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(())
    }

    /// Replaces or clears the content expiry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DecreeFinalized` if the decree is terminal.
    pub fn set_expires_at(&mut self, expires_at: Option<OffsetDateTime>) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.expires_at = expires_at;
        Ok(())
    }

    /// Converts the decree into its storage representation.
    #[must_use]
    pub fn to_stored(&self) -> StoredDecree {
        StoredDecree {
            id: self.id,
            status: self.status,
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            created_by: self.created_by.clone(),
            voting_opened_at: self.voting_opened_at,
            voting_closes_at: self.voting_closes_at,
            expires_at: self.expires_at,
            votes: self.votes.clone(),
        }
    }

    /// Rebuilds a decree from storage.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InconsistentRecord` if:
    /// - The identifier is not positive
    /// - A draft carries votes or a voting window
    /// - A decree in `Voting` has no opening time
    /// - A deadline is stored without an opening time
    pub fn restore(stored: StoredDecree) -> Result<Self, DomainError> {
        let inconsistent = |reason: &str| DomainError::InconsistentRecord {
            decree_id: stored.id,
            reason: reason.to_string(),
        };

        if stored.id.value() <= 0 {
            return Err(inconsistent("identifier must be positive"));
        }
        if stored.status == DecreeStatus::Draft
            && (!stored.votes.is_empty() || stored.voting_opened_at.is_some())
        {
            return Err(inconsistent("draft carries votes or a voting window"));
        }
        if stored.status == DecreeStatus::Voting && stored.voting_opened_at.is_none() {
            return Err(inconsistent("voting decree has no opening time"));
        }
        if stored.voting_closes_at.is_some() && stored.voting_opened_at.is_none() {
            return Err(inconsistent("deadline stored without an opening time"));
        }

        Ok(Self {
            id: stored.id,
            status: stored.status,
            title: stored.title,
            description: stored.description,
            category: stored.category,
            created_by: stored.created_by,
            voting_opened_at: stored.voting_opened_at,
            voting_closes_at: stored.voting_closes_at,
            expires_at: stored.expires_at,
            votes: stored.votes,
        })
    }

    fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::DecreeFinalized {
                decree_id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String, DomainError> {
    let trimmed: &str = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }
    Ok(trimmed.to_string())
}
