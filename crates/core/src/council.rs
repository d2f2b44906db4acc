// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The engine facade.
//!
//! [`Council`] owns the decree store and the collaborators. Both finalization
//! triggers (a vote being cast and the periodic sweep) run through
//! [`evaluate`], so they can never disagree about an outcome. Callers
//! serialize access through `&mut self`; once a decree is terminal the
//! transition validator refuses any further change, so at most one
//! finalization is ever applied per decree.

use crate::backend::DecreeBackend;
use crate::collaborators::{Clock, Collaborators, NotificationSink, RulesProvider, SeatRoster};
use crate::error::CoreError;
use crate::evaluate::{Verdict, evaluate};
use crate::notification::Notification;
use crate::stats::{self, SeatStats};
use crate::store::DecreeStore;
use decrees_audit::{Actor, HistoryEntry, HistoryOrder, HistoryPage};
use decrees_domain::{
    ClosureReason, Decree, DecreeId, DecreeStatus, DomainError, Resolution, SeatId, VoteChoice,
    VotingRules, quorum_required,
};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tracing::{debug, error, info, warn};

/// Result of evaluating one decree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// The decree was not in `Voting`.
    NotVoting,
    /// The decree stays open.
    Pending(Resolution),
    /// The decree reached a terminal status.
    Finalized {
        status: DecreeStatus,
        reason: ClosureReason,
    },
    /// The validator refused the resolved transition. Nothing changed.
    Blocked { target: DecreeStatus },
}

/// Result of a successful vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteReceipt {
    /// The decree after the vote and any finalization.
    pub decree: Decree,
    /// The seat's earlier vote, if it was overwritten.
    pub replaced: Option<VoteChoice>,
    /// What the evaluation after the vote decided.
    pub evaluation: Evaluation,
    /// Active seats still missing a vote, computed before finalization.
    pub missing_seats: Vec<SeatId>,
}

/// Result of one sweep over every decree in `Voting`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Decrees in `Voting` that were looked at.
    pub examined: usize,
    /// Decrees without a deadline, which never close on time.
    pub skipped: usize,
    /// Decrees finalized by this sweep.
    pub finalized: Vec<(DecreeId, DecreeStatus)>,
    /// Decrees whose finalization could not be stored.
    pub failures: Vec<(DecreeId, CoreError)>,
}

/// Change to a decree's content expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryChange {
    /// Expire this many days from now.
    InDays(u32),
    /// Remove the expiry.
    Clear,
}

/// Edits applied to one decree and stored in a single write.
///
/// `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecreeEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub expiry: Option<ExpiryChange>,
}

impl DecreeEdit {
    /// Whether the edit changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.expiry.is_none()
    }
}

/// The decree governance engine.
pub struct Council<B: DecreeBackend> {
    store: DecreeStore<B>,
    roster: Arc<dyn SeatRoster>,
    rules: Arc<dyn RulesProvider>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn NotificationSink>,
}

impl<B: DecreeBackend> Council<B> {
    /// Loads the engine from its backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored state cannot be loaded.
    pub fn new(backend: B, collaborators: Collaborators) -> Result<Self, CoreError> {
        let store: DecreeStore<B> = DecreeStore::open(backend)?;
        Ok(Self {
            store,
            roster: collaborators.roster,
            rules: collaborators.rules,
            clock: collaborators.clock,
            notifier: collaborators.notifier,
        })
    }

    /// The rules currently in force.
    #[must_use]
    pub fn current_rules(&self) -> VotingRules {
        self.rules.current()
    }

    /// The current time according to the engine's clock.
    #[must_use]
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        self.store.backend()
    }

    pub const fn backend_mut(&mut self) -> &mut B {
        self.store.backend_mut()
    }

    /// Creates a draft decree authored by an active seat.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The author is not an active seat
    /// - The title is blank
    /// - The write fails
    pub fn create_decree(&mut self, title: &str, author: &SeatId) -> Result<Decree, CoreError> {
        self.create_decree_with(title, author, None, None)
    }

    /// Creates a draft decree with its description and category in one write.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The author is not an active seat
    /// - The title is blank
    /// - The write fails; nothing is stored
    pub fn create_decree_with(
        &mut self,
        title: &str,
        author: &SeatId,
        description: Option<String>,
        category: Option<String>,
    ) -> Result<Decree, CoreError> {
        self.ensure_active(author)?;
        let mut decree: Decree = Decree::new(self.store.next_id(), title, author.clone())?;
        decree.set_description(description)?;
        decree.set_category(category)?;
        self.store.commit(decree.clone(), None)?;

        info!(decree_id = %decree.id(), author = %author, "Decree created");
        Ok(decree)
    }

    /// Opens a draft for voting and fixes its deadline from the current rules.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The decree does not exist
    /// - The decree is not a draft
    /// - The write fails
    pub fn open_for_voting(&mut self, id: DecreeId) -> Result<Decree, CoreError> {
        let mut candidate: Decree = self.store.get(id)?.clone();
        let rules: VotingRules = self.rules.current();
        candidate.open_voting(self.clock.now(), &rules)?;
        self.store.commit(candidate.clone(), None)?;

        info!(decree_id = %id, closes_at = ?candidate.voting_closes_at(), "Decree opened for voting");
        self.announce_opened(&candidate);
        Ok(candidate)
    }

    /// Records a vote and evaluates the decree straight away.
    ///
    /// A seat voting again replaces its earlier vote. The vote and any
    /// resulting finalization are stored in one write.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The seat is not active
    /// - The decree does not exist or is not in `Voting`
    /// - The write fails; nothing is changed
    pub fn cast_vote(
        &mut self,
        id: DecreeId,
        seat: &SeatId,
        choice: VoteChoice,
    ) -> Result<VoteReceipt, CoreError> {
        self.ensure_active(seat)?;
        let mut candidate: Decree = self.store.get(id)?.clone();
        let replaced: Option<VoteChoice> = candidate.record_vote(seat.clone(), choice)?;

        let rules: VotingRules = self.rules.current();
        let active_seats: u32 = self.roster.active_seat_count();
        let missing_seats: Vec<SeatId> = self.roster.seats_missing_vote(&candidate);
        let now: OffsetDateTime = self.clock.now();

        let evaluation: Evaluation = self.settle(candidate, true, &rules, active_seats, now)?;

        self.notifier.notify(&Notification::VoteCast {
            decree_id: id,
            seat: seat.clone(),
            choice,
            replaced,
        });
        match evaluation {
            Evaluation::Finalized { status, reason } => self.announce_finalized(id, status, reason),
            Evaluation::Pending(_) => {
                if let [missing_seat] = missing_seats.as_slice() {
                    self.notifier.notify(&Notification::OneVoteRemaining {
                        decree_id: id,
                        missing_seat: missing_seat.clone(),
                    });
                }
            }
            Evaluation::NotVoting | Evaluation::Blocked { .. } => {}
        }

        Ok(VoteReceipt {
            decree: self.store.get(id)?.clone(),
            replaced,
            evaluation,
            missing_seats,
        })
    }

    /// Forces a decree into a terminal status without evaluating the rules.
    ///
    /// The transition validator still applies, and `Voting` cannot be forced:
    /// voting opens only through [`Council::open_for_voting`]. The forced
    /// closure records a history entry whose quorum figures use the current
    /// rules and roster.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The decree does not exist
    /// - The target is not terminal, or the transition is illegal or redundant
    /// - The write fails
    pub fn force_status(
        &mut self,
        id: DecreeId,
        target: DecreeStatus,
        actor: &Actor,
    ) -> Result<Decree, CoreError> {
        let mut candidate: Decree = self.store.get(id)?.clone();
        let from: DecreeStatus = candidate.status();
        let checked: Result<(), DomainError> = if target.is_terminal() {
            from.validate_transition(target)
        } else {
            Err(DomainError::InvalidStatusTransition {
                from,
                to: target,
                reason: String::from("only enacted, rejected or cancelled can be forced"),
            })
        };
        if let Err(err) = checked {
            warn!(
                decree_id = %id,
                from = %from,
                to = %target,
                actor = %actor.id,
                "Blocked illegal decree state transition"
            );
            return Err(err.into());
        }

        let now: OffsetDateTime = self.clock.now();
        let rules: VotingRules = self.rules.current();

        candidate.transition_to(target)?;
        let required: u32 =
            quorum_required(self.roster.active_seat_count(), rules.min_quorum_percent);
        let met: bool = candidate.tally().cast() >= required;
        let entry: HistoryEntry = HistoryEntry::capture(
            &candidate,
            required,
            met,
            now,
            ClosureReason::Forced,
            Some(actor.clone()),
        );
        self.store.commit(candidate.clone(), Some(entry))?;
        self.announce_finalized(id, target, ClosureReason::Forced);

        info!(decree_id = %id, from = %from, to = %target, actor = %actor.id, "Decree status forced");
        Ok(candidate)
    }

    /// Deletes a draft.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The decree does not exist
    /// - The decree is not a draft
    /// - The write fails; the draft is kept
    pub fn delete_draft(&mut self, id: DecreeId) -> Result<Decree, CoreError> {
        let status: DecreeStatus = self.store.get(id)?.status();
        if status != DecreeStatus::Draft {
            return Err(DomainError::NotDraft {
                decree_id: id,
                status,
            }
            .into());
        }
        let removed: Decree = self.store.remove(id)?;

        info!(decree_id = %id, "Draft deleted");
        Ok(removed)
    }

    /// Replaces the title of a non-terminal decree.
    ///
    /// # Errors
    ///
    /// Returns an error if the decree is missing or terminal, the title is
    /// blank, or the write fails.
    pub fn edit_title(&mut self, id: DecreeId, title: &str) -> Result<Decree, CoreError> {
        self.edit(id, |decree| decree.set_title(title))
    }

    /// Replaces or clears the description of a non-terminal decree.
    ///
    /// # Errors
    ///
    /// Returns an error if the decree is missing or terminal, or the write fails.
    pub fn edit_description(
        &mut self,
        id: DecreeId,
        description: Option<String>,
    ) -> Result<Decree, CoreError> {
        self.edit(id, |decree| decree.set_description(description))
    }

    /// Replaces or clears the category of a non-terminal decree.
    ///
    /// # Errors
    ///
    /// Returns an error if the decree is missing or terminal, or the write fails.
    pub fn edit_category(
        &mut self,
        id: DecreeId,
        category: Option<String>,
    ) -> Result<Decree, CoreError> {
        self.edit(id, |decree| decree.set_category(category))
    }

    /// Sets the content expiry to `days` days from now.
    ///
    /// # Errors
    ///
    /// Returns an error if the decree is missing or terminal, the expiry
    /// cannot be represented, or the write fails.
    pub fn set_expiry_days(&mut self, id: DecreeId, days: u32) -> Result<Decree, CoreError> {
        let expires_at: OffsetDateTime = self.expiry_from_now(id, days)?;
        self.edit(id, |decree| decree.set_expires_at(Some(expires_at)))
    }

    /// Applies several edits to one decree and stores them together.
    ///
    /// Every field is checked before anything is written, so either all
    /// edits are stored or none are.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The decree is missing or terminal
    /// - The new title is blank
    /// - The expiry cannot be represented
    /// - The write fails
    pub fn edit_decree(&mut self, id: DecreeId, edit: DecreeEdit) -> Result<Decree, CoreError> {
        let expires_at: Option<Option<OffsetDateTime>> = match edit.expiry {
            Some(ExpiryChange::InDays(days)) => Some(Some(self.expiry_from_now(id, days)?)),
            Some(ExpiryChange::Clear) => Some(None),
            None => None,
        };

        self.edit(id, move |decree| {
            if let Some(title) = edit.title.as_deref() {
                decree.set_title(title)?;
            }
            if edit.description.is_some() {
                decree.set_description(edit.description)?;
            }
            if edit.category.is_some() {
                decree.set_category(edit.category)?;
            }
            if let Some(expires_at) = expires_at {
                decree.set_expires_at(expires_at)?;
            }
            Ok(())
        })
    }

    /// Clears the content expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the decree is missing or terminal, or the write fails.
    pub fn clear_expiry(&mut self, id: DecreeId) -> Result<Decree, CoreError> {
        self.edit(id, |decree| decree.set_expires_at(None))
    }

    /// Returns a copy of a decree.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DecreeNotFound` if the id is unknown.
    pub fn get_decree(&self, id: DecreeId) -> Result<Decree, CoreError> {
        self.store.get(id).cloned()
    }

    /// Decrees with the given status, or every decree, in id order.
    #[must_use]
    pub fn list_by_status(&self, status: Option<DecreeStatus>) -> Vec<Decree> {
        self.store
            .iter()
            .filter(|decree| status.is_none_or(|s| decree.status() == s))
            .cloned()
            .collect()
    }

    /// Decrees in a category, compared case-insensitively.
    #[must_use]
    pub fn list_by_category(&self, category: &str) -> Vec<Decree> {
        let wanted: String = category.trim().to_lowercase();
        self.store
            .iter()
            .filter(|decree| {
                decree
                    .category()
                    .is_some_and(|c| c.to_lowercase() == wanted)
            })
            .cloned()
            .collect()
    }

    /// Decrees authored by a seat.
    #[must_use]
    pub fn list_by_author(&self, author: &SeatId) -> Vec<Decree> {
        self.store
            .iter()
            .filter(|decree| decree.created_by() == author)
            .cloned()
            .collect()
    }

    /// Authoring and voting figures for every declared seat, then for any
    /// undeclared seat that still appears on a decree.
    #[must_use]
    pub fn seat_stats(&self) -> Vec<SeatStats> {
        stats::seat_stats(&self.roster.seats(), self.store.iter())
    }

    /// Figures for one seat, or `None` if it is neither declared nor seen
    /// on any decree.
    #[must_use]
    pub fn seat_stats_for(&self, seat: &SeatId) -> Option<SeatStats> {
        self.seat_stats()
            .into_iter()
            .find(|entry| &entry.seat_id == seat)
    }

    /// Evaluates every decree in `Voting` at `now`.
    ///
    /// Decrees without a deadline are skipped. A failed write for one decree
    /// is reported and the sweep moves on to the next. Running the sweep again
    /// with nothing new to decide changes nothing.
    pub fn run_periodic_sweep(&mut self, now: OffsetDateTime) -> SweepReport {
        let voting: Vec<DecreeId> = self
            .store
            .iter()
            .filter(|decree| decree.status() == DecreeStatus::Voting)
            .map(Decree::id)
            .collect();

        let mut report: SweepReport = SweepReport::default();
        for id in voting {
            let rules: VotingRules = self.rules.current();
            let Some(decree) = self.store.find(id) else {
                continue;
            };
            report.examined += 1;
            if decree.voting_deadline(&rules).is_none() {
                report.skipped += 1;
                continue;
            }

            let candidate: Decree = decree.clone();
            let active_seats: u32 = self.roster.active_seat_count();
            match self.settle(candidate, false, &rules, active_seats, now) {
                Ok(Evaluation::Finalized { status, reason }) => {
                    self.announce_finalized(id, status, reason);
                    report.finalized.push((id, status));
                }
                Ok(_) => {}
                Err(err) => {
                    error!(decree_id = %id, error = %err, "Sweep could not finalize decree");
                    report.failures.push((id, err));
                }
            }
        }

        debug!(
            examined = report.examined,
            skipped = report.skipped,
            finalized = report.finalized.len(),
            failures = report.failures.len(),
            "Periodic sweep complete"
        );
        report
    }

    /// Runs the periodic sweep at the clock's current time.
    pub fn sweep(&mut self) -> SweepReport {
        let now: OffsetDateTime = self.clock.now();
        self.run_periodic_sweep(now)
    }

    /// Sorted copy of the history log.
    #[must_use]
    pub fn history_snapshot(&self, order: HistoryOrder) -> Vec<HistoryEntry> {
        self.store.history().snapshot(order)
    }

    /// One page of the sorted history log.
    #[must_use]
    pub fn history_page(&self, page: usize, order: HistoryOrder) -> HistoryPage {
        self.store.history().page(page, order)
    }

    /// Evaluates a candidate and stores the result.
    ///
    /// `dirty` marks a candidate that differs from the stored decree (a new
    /// vote) and must be written even when nothing is resolved.
    fn settle(
        &mut self,
        mut candidate: Decree,
        dirty: bool,
        rules: &VotingRules,
        active_seats: u32,
        now: OffsetDateTime,
    ) -> Result<Evaluation, CoreError> {
        let id: DecreeId = candidate.id();
        let evaluation: Evaluation = match evaluate(&candidate, rules, active_seats, now) {
            Verdict::NotVoting => Evaluation::NotVoting,
            Verdict::Undecided(resolution) => {
                debug!(
                    decree_id = %id,
                    quorum_required = resolution.quorum_required,
                    quorum_met = resolution.quorum_met,
                    "Decree remains in voting"
                );
                Evaluation::Pending(resolution)
            }
            Verdict::Resolve {
                target,
                reason,
                resolution,
            } => match candidate.transition_to(target) {
                Ok(_) => {
                    let entry: HistoryEntry = HistoryEntry::capture(
                        &candidate,
                        resolution.quorum_required,
                        resolution.quorum_met,
                        now,
                        reason,
                        None,
                    );
                    self.store.commit(candidate, Some(entry))?;
                    info!(decree_id = %id, status = %target, reason = %reason, "Decree finalized");
                    return Ok(Evaluation::Finalized {
                        status: target,
                        reason,
                    });
                }
                Err(err) => {
                    warn!(decree_id = %id, to = %target, error = %err, "Blocked illegal decree state transition");
                    Evaluation::Blocked { target }
                }
            },
        };

        if dirty {
            self.store.commit(candidate, None)?;
        }
        Ok(evaluation)
    }

    fn edit<F>(&mut self, id: DecreeId, apply: F) -> Result<Decree, CoreError>
    where
        F: FnOnce(&mut Decree) -> Result<(), DomainError>,
    {
        let mut candidate: Decree = self.store.get(id)?.clone();
        apply(&mut candidate)?;
        self.store.commit(candidate.clone(), None)?;

        info!(decree_id = %id, "Decree edited");
        Ok(candidate)
    }

    fn expiry_from_now(&self, id: DecreeId, days: u32) -> Result<OffsetDateTime, CoreError> {
        self.clock
            .now()
            .checked_add(Duration::days(i64::from(days)))
            .ok_or_else(|| {
                DomainError::DateArithmeticOverflow {
                    operation: format!("computing expiry for decree {id}"),
                }
                .into()
            })
    }

    fn ensure_active(&self, seat: &SeatId) -> Result<(), CoreError> {
        if !self.roster.is_active(seat) {
            return Err(DomainError::SeatNotActive(seat.clone()).into());
        }
        Ok(())
    }

    fn announce_opened(&self, decree: &Decree) {
        self.notifier.notify(&Notification::VotingOpened {
            decree_id: decree.id(),
            title: decree.title().to_string(),
            closes_at: decree.voting_closes_at(),
        });
    }

    fn announce_finalized(&self, decree_id: DecreeId, status: DecreeStatus, reason: ClosureReason) {
        self.notifier.notify(&Notification::Finalized {
            decree_id,
            status,
            reason,
        });
    }
}
