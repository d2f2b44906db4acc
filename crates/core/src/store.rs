// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The authoritative decree collection.
//!
//! Every mutation is written through to the backend before it becomes
//! visible. A failed write restores the previous in-memory state, so the
//! store never disagrees with what was durably stored.

use crate::backend::{DecreeBackend, PersistedState, StoreWrite};
use crate::error::CoreError;
use decrees_audit::{HistoryEntry, HistoryLog};
use decrees_domain::{Decree, DecreeId, StoredDecree};
use std::collections::BTreeMap;
use tracing::{debug, error};

/// Decrees keyed by id, the id counter, and the history log.
#[derive(Debug)]
pub struct DecreeStore<B: DecreeBackend> {
    backend: B,
    decrees: BTreeMap<DecreeId, Decree>,
    history: HistoryLog,
    next_id: i64,
}

impl<B: DecreeBackend> DecreeStore<B> {
    /// Loads the store from its backend.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The backend cannot be read
    /// - A stored decree violates the record invariants
    /// - Two history entries exist for the same decree
    pub fn open(mut backend: B) -> Result<Self, CoreError> {
        let state: PersistedState = backend
            .load()
            .map_err(|e| CoreError::PersistenceFailure(e.to_string()))?;

        let mut decrees: BTreeMap<DecreeId, Decree> = BTreeMap::new();
        for stored in state.decrees {
            let decree: Decree = Decree::restore(stored)?;
            decrees.insert(decree.id(), decree);
        }
        let history: HistoryLog = HistoryLog::from_entries(state.history)?;

        let highest: i64 = decrees.keys().next_back().map_or(0, DecreeId::value);
        let next_id: i64 = state.next_id.max(highest + 1).max(1);

        debug!(
            decrees = decrees.len(),
            history = history.len(),
            next_id,
            "Decree store loaded"
        );

        Ok(Self {
            backend,
            decrees,
            history,
            next_id,
        })
    }

    /// The identifier the next created decree receives.
    #[must_use]
    pub const fn next_id(&self) -> DecreeId {
        DecreeId::new(self.next_id)
    }

    #[must_use]
    pub fn find(&self, id: DecreeId) -> Option<&Decree> {
        self.decrees.get(&id)
    }

    /// Looks up a decree.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DecreeNotFound` if the id is unknown.
    pub fn get(&self, id: DecreeId) -> Result<&Decree, CoreError> {
        self.decrees.get(&id).ok_or(CoreError::DecreeNotFound(id))
    }

    /// Decrees in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Decree> {
        self.decrees.values()
    }

    #[must_use]
    pub const fn history(&self) -> &HistoryLog {
        &self.history
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Stores a new or changed decree, optionally with its history entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The decree already has a history entry
    /// - The backend write fails; the previous decree is restored
    pub fn commit(&mut self, decree: Decree, entry: Option<HistoryEntry>) -> Result<(), CoreError> {
        if let Some(entry) = &entry {
            self.history.ensure_absent(entry.decree_id)?;
        }

        let id: DecreeId = decree.id();
        let next_id: i64 = self.next_id.max(id.value() + 1);
        let previous: Option<Decree> = self.decrees.insert(id, decree);

        if let Err(err) = self.write(next_id, entry.as_ref()) {
            match previous {
                Some(previous) => {
                    self.decrees.insert(id, previous);
                }
                None => {
                    self.decrees.remove(&id);
                }
            }
            return Err(err);
        }

        self.next_id = next_id;
        if let Some(entry) = entry {
            self.history.record(entry)?;
        }
        Ok(())
    }

    /// Removes a decree.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The id is unknown
    /// - The backend write fails; the decree is restored
    pub fn remove(&mut self, id: DecreeId) -> Result<Decree, CoreError> {
        let removed: Decree = self
            .decrees
            .remove(&id)
            .ok_or(CoreError::DecreeNotFound(id))?;

        if let Err(err) = self.write(self.next_id, None) {
            self.decrees.insert(id, removed);
            return Err(err);
        }
        Ok(removed)
    }

    fn write(&mut self, next_id: i64, entry: Option<&HistoryEntry>) -> Result<(), CoreError> {
        let decrees: Vec<StoredDecree> = self.decrees.values().map(Decree::to_stored).collect();
        self.backend
            .persist(StoreWrite {
                next_id,
                decrees: &decrees,
                history_entry: entry,
            })
            .map_err(|e| {
                error!(error = %e, "Failed to persist decree store");
                CoreError::PersistenceFailure(e.to_string())
            })
    }
}
