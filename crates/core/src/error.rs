// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use decrees_audit::HistoryError;
use decrees_domain::{DecreeId, DomainError};

/// Errors returned by the decree engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// No decree has the requested identifier.
    DecreeNotFound(DecreeId),
    /// A domain rule was violated. The decree is left untouched.
    DomainViolation(DomainError),
    /// The history log refused an entry.
    HistoryViolation(HistoryError),
    /// The durable write did not complete. In-memory state was rolled back.
    PersistenceFailure(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DecreeNotFound(id) => write!(f, "Decree {id} not found"),
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::HistoryViolation(err) => write!(f, "History violation: {err}"),
            Self::PersistenceFailure(msg) => write!(f, "Persistence failure: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<HistoryError> for CoreError {
    fn from(err: HistoryError) -> Self {
        Self::HistoryViolation(err)
    }
}
