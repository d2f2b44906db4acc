// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborators the engine consumes, with stock implementations.
//!
//! The roster and rules are read fresh on every evaluation. Both stock
//! implementations are cheap handles over shared state so a reload can
//! swap the contents while the engine keeps running.

use crate::notification::Notification;
use decrees_domain::{Decree, DomainError, Seat, SeatId, VotingRules};
use std::sync::{Arc, RwLock};
use time::OffsetDateTime;
use tracing::info;

/// Source of the declared and currently occupied seats.
pub trait SeatRoster: Send + Sync {
    /// Every declared seat, occupied or not, in declaration order.
    fn seats(&self) -> Vec<Seat>;

    /// Identifiers of every seat that currently has a holder.
    fn active_seats(&self) -> Vec<SeatId> {
        self.seats()
            .into_iter()
            .filter(Seat::is_active)
            .map(|seat| seat.id)
            .collect()
    }

    /// Number of occupied seats.
    fn active_seat_count(&self) -> u32 {
        u32::try_from(self.active_seats().len()).unwrap_or(u32::MAX)
    }

    /// Whether the seat exists and has a holder.
    fn is_active(&self, seat: &SeatId) -> bool {
        self.active_seats().contains(seat)
    }

    /// Active seats that have not voted on the decree.
    fn seats_missing_vote(&self, decree: &Decree) -> Vec<SeatId> {
        decree.seats_missing_vote(&self.active_seats())
    }
}

/// Source of the voting rules in force.
pub trait RulesProvider: Send + Sync {
    fn current(&self) -> VotingRules;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Receiver of engine notifications. Fire and forget.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// The full set of collaborators handed to the engine.
#[derive(Clone)]
pub struct Collaborators {
    pub roster: Arc<dyn SeatRoster>,
    pub rules: Arc<dyn RulesProvider>,
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn NotificationSink>,
}

/// Hot-reloadable voting rules.
#[derive(Debug, Clone, Default)]
pub struct SharedRules {
    inner: Arc<RwLock<VotingRules>>,
}

impl SharedRules {
    #[must_use]
    pub fn new(rules: VotingRules) -> Self {
        Self {
            inner: Arc::new(RwLock::new(rules)),
        }
    }

    /// Replaces the rules in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the new rules are invalid. The current rules are kept.
    pub fn replace(&self, rules: VotingRules) -> Result<(), DomainError> {
        rules.validate()?;
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = rules;
        Ok(())
    }
}

impl RulesProvider for SharedRules {
    fn current(&self) -> VotingRules {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Hot-reloadable council roster.
#[derive(Debug, Clone, Default)]
pub struct CouncilRoster {
    inner: Arc<RwLock<Vec<Seat>>>,
}

impl CouncilRoster {
    #[must_use]
    pub fn new(seats: Vec<Seat>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(seats)),
        }
    }

    /// Replaces every seat.
    pub fn replace(&self, seats: Vec<Seat>) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = seats;
    }
}

impl SeatRoster for CouncilRoster {
    fn seats(&self) -> Vec<Seat> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification {
            Notification::VotingOpened {
                decree_id,
                title,
                closes_at,
            } => {
                info!(decree_id = %decree_id, title = %title, closes_at = ?closes_at, "Voting opened");
            }
            Notification::VoteCast {
                decree_id,
                seat,
                choice,
                replaced,
            } => {
                info!(decree_id = %decree_id, seat = %seat, choice = %choice, replaced = ?replaced, "Vote cast");
            }
            Notification::OneVoteRemaining {
                decree_id,
                missing_seat,
            } => {
                info!(decree_id = %decree_id, missing_seat = %missing_seat, "One vote remaining");
            }
            Notification::Finalized {
                decree_id,
                status,
                reason,
            } => {
                info!(decree_id = %decree_id, status = %status, reason = %reason, "Decree finalized");
            }
        }
    }
}
