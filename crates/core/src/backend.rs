// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Durable storage seam for the decree store.

use decrees_audit::HistoryEntry;
use decrees_domain::StoredDecree;

/// Everything the store needs to rebuild itself on startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    /// The next identifier to allocate.
    pub next_id: i64,
    /// Every decree, in any order.
    pub decrees: Vec<StoredDecree>,
    /// Every history entry, in recording order.
    pub history: Vec<HistoryEntry>,
}

/// One write of the store.
///
/// The backend must apply the whole snapshot atomically: either the full
/// decree collection, the counter and the optional history entry are all
/// stored, or none of them are.
#[derive(Debug, Clone, Copy)]
pub struct StoreWrite<'a> {
    /// The counter after this mutation.
    pub next_id: i64,
    /// The complete decree collection after this mutation.
    pub decrees: &'a [StoredDecree],
    /// A history entry to append with this mutation.
    pub history_entry: Option<&'a HistoryEntry>,
}

/// A blocking, durable store for decrees and history.
pub trait DecreeBackend {
    /// The backend's failure type.
    type Error: std::fmt::Display;

    /// Loads the stored state.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored state cannot be read.
    fn load(&mut self) -> Result<PersistedState, Self::Error>;

    /// Applies one store write atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the write did not complete. Nothing is stored in
    /// that case.
    fn persist(&mut self, write: StoreWrite<'_>) -> Result<(), Self::Error>;
}

/// Failure reported by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBackendError(pub String);

impl std::fmt::Display for MemoryBackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "memory backend: {}", self.0)
    }
}

impl std::error::Error for MemoryBackendError {}

/// In-process backend.
///
/// Keeps the last written state and can be told to fail writes, which
/// makes it the backend of choice for engine tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: PersistedState,
    failing: bool,
    writes: usize,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that starts with the given state.
    #[must_use]
    pub const fn with_state(state: PersistedState) -> Self {
        Self {
            state,
            failing: false,
            writes: 0,
        }
    }

    /// Makes every following write fail until cleared.
    pub const fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// The last successfully written state.
    #[must_use]
    pub const fn state(&self) -> &PersistedState {
        &self.state
    }

    /// Number of successful writes.
    #[must_use]
    pub const fn write_count(&self) -> usize {
        self.writes
    }
}

impl DecreeBackend for MemoryBackend {
    type Error = MemoryBackendError;

    fn load(&mut self) -> Result<PersistedState, Self::Error> {
        Ok(self.state.clone())
    }

    fn persist(&mut self, write: StoreWrite<'_>) -> Result<(), Self::Error> {
        if self.failing {
            return Err(MemoryBackendError(String::from("store unavailable")));
        }
        self.state.next_id = write.next_id;
        self.state.decrees = write.decrees.to_vec();
        if let Some(entry) = write.history_entry {
            self.state.history.push(entry.clone());
        }
        self.writes += 1;
        Ok(())
    }
}
