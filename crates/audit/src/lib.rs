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
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Decree history.
//!
//! Every decree that reaches a terminal status gets exactly one
//! [`HistoryEntry`]. Entries are snapshots: they copy the title and the
//! final counts so that later edits elsewhere never change what was
//! recorded.

use decrees_domain::{ClosureReason, Decree, DecreeId, DecreeStatus, Tally};
use time::OffsetDateTime;

#[cfg(test)]
mod tests;

/// Number of entries on one history page.
pub const HISTORY_PAGE_SIZE: usize = 7;

/// Represents the entity that closed a decree by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "operator", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Creates an operator actor.
    #[must_use]
    pub fn operator(id: &str) -> Self {
        Self::new(id.to_string(), String::from("operator"))
    }
}

/// Immutable record of a decree reaching a terminal status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The decree.
    pub decree_id: DecreeId,
    /// The terminal status reached.
    pub final_status: DecreeStatus,
    /// The title at closure time.
    pub title: String,
    /// Final counts.
    pub tally: Tally,
    /// Votes cast, abstentions included.
    pub total_votes: u32,
    /// Votes that were required for quorum.
    pub quorum_required: u32,
    /// Whether quorum was reached.
    pub quorum_met: bool,
    /// When the decree closed.
    pub closed_at: OffsetDateTime,
    /// Why the decree closed.
    pub reason: ClosureReason,
    /// Who closed the decree, for forced closures.
    pub closed_by: Option<Actor>,
}

impl HistoryEntry {
    /// Captures a snapshot of a decree that has just become terminal.
    ///
    /// # Arguments
    ///
    /// * `decree` - The decree, already in its terminal status
    /// * `quorum_required` - Votes required for quorum at closure
    /// * `quorum_met` - Whether quorum was reached
    /// * `closed_at` - The closure time
    /// * `reason` - Why the decree closed
    /// * `closed_by` - The operator, for forced closures
    #[must_use]
    pub fn capture(
        decree: &Decree,
        quorum_required: u32,
        quorum_met: bool,
        closed_at: OffsetDateTime,
        reason: ClosureReason,
        closed_by: Option<Actor>,
    ) -> Self {
        let tally: Tally = decree.tally();
        Self {
            decree_id: decree.id(),
            final_status: decree.status(),
            title: decree.title().to_string(),
            tally,
            total_votes: tally.cast(),
            quorum_required,
            quorum_met,
            closed_at,
            reason,
            closed_by,
        }
    }
}

/// Errors raised by the history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The decree already has a history entry.
    DuplicateEntry(DecreeId),
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEntry(id) => {
                write!(f, "Decree {id} already has a history entry")
            }
        }
    }
}

impl std::error::Error for HistoryError {}

/// Sort order for history views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryOrder {
    /// Earliest closure first.
    OldestFirst,
    /// Latest closure first.
    #[default]
    NewestFirst,
}

/// One page of a history view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage {
    /// The entries on this page.
    pub entries: Vec<HistoryEntry>,
    /// The page number, starting at 1, after clamping.
    pub page: usize,
    /// Number of pages. 0 when the history is empty.
    pub total_pages: usize,
    /// Number of entries across all pages.
    pub total_entries: usize,
}

/// Append-only log of closed decrees.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuilds a log from previously persisted entries.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::DuplicateEntry` if two entries share a decree.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Result<Self, HistoryError> {
        let mut log: Self = Self::new();
        for entry in entries {
            log.record(entry)?;
        }
        Ok(log)
    }

    /// Fails if the decree already has an entry.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::DuplicateEntry` if an entry exists.
    pub fn ensure_absent(&self, decree_id: DecreeId) -> Result<(), HistoryError> {
        if self.contains(decree_id) {
            return Err(HistoryError::DuplicateEntry(decree_id));
        }
        Ok(())
    }

    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::DuplicateEntry` if the decree already has one.
    pub fn record(&mut self, entry: HistoryEntry) -> Result<(), HistoryError> {
        self.ensure_absent(entry.decree_id)?;
        self.entries.push(entry);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, decree_id: DecreeId) -> bool {
        self.entries.iter().any(|e| e.decree_id == decree_id)
    }

    #[must_use]
    pub fn find(&self, decree_id: DecreeId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.decree_id == decree_id)
    }

    /// Entries in the order they were recorded.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a sorted copy of the log.
    ///
    /// Entries closed at the same instant are ordered by decree id.
    #[must_use]
    pub fn snapshot(&self, order: HistoryOrder) -> Vec<HistoryEntry> {
        let mut copy: Vec<HistoryEntry> = self.entries.clone();
        copy.sort_by(|a, b| {
            a.closed_at
                .cmp(&b.closed_at)
                .then_with(|| a.decree_id.cmp(&b.decree_id))
        });
        if order == HistoryOrder::NewestFirst {
            copy.reverse();
        }
        copy
    }

    /// Returns one page of the sorted log.
    ///
    /// The page number is clamped into `1..=total_pages`. An empty log
    /// yields page 1 of 0.
    #[must_use]
    pub fn page(&self, page: usize, order: HistoryOrder) -> HistoryPage {
        let sorted: Vec<HistoryEntry> = self.snapshot(order);
        let total_entries: usize = sorted.len();
        let total_pages: usize = total_entries.div_ceil(HISTORY_PAGE_SIZE);
        let page: usize = page.clamp(1, total_pages.max(1));

        let entries: Vec<HistoryEntry> = sorted
            .into_iter()
            .skip((page - 1) * HISTORY_PAGE_SIZE)
            .take(HISTORY_PAGE_SIZE)
            .collect();

        HistoryPage {
            entries,
            page,
            total_pages,
            total_entries,
        }
    }
}
