// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use decrees::CoreError;
use decrees_audit::HistoryError;
use decrees_domain::DomainError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidStatusTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("decree_lifecycle"),
            message,
        },
        DomainError::NotVotingPhase { .. } => ApiError::DomainRuleViolation {
            rule: String::from("voting_phase"),
            message,
        },
        DomainError::NotDraft { .. } => ApiError::DomainRuleViolation {
            rule: String::from("draft_only"),
            message,
        },
        DomainError::DecreeFinalized { .. } => ApiError::DomainRuleViolation {
            rule: String::from("decree_finalized"),
            message,
        },
        DomainError::SeatNotActive(_) => ApiError::DomainRuleViolation {
            rule: String::from("active_seat"),
            message,
        },
        DomainError::InvalidTitle(msg) => ApiError::InvalidInput {
            field: String::from("title"),
            message: msg,
        },
        DomainError::InvalidQuorumPercent(_) => ApiError::InvalidInput {
            field: String::from("min_quorum_percent"),
            message,
        },
        DomainError::InvalidStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message,
        },
        DomainError::InvalidVoteChoice(_) => ApiError::InvalidInput {
            field: String::from("choice"),
            message,
        },
        DomainError::InvalidMajorityMode(_) => ApiError::InvalidInput {
            field: String::from("majority_mode"),
            message,
        },
        DomainError::InvalidClosureReason(_)
        | DomainError::InconsistentRecord { .. }
        | DomainError::DateArithmeticOverflow { .. } => ApiError::Internal { message },
    }
}

/// Translates a history log error into an API error.
#[must_use]
pub fn translate_history_error(err: HistoryError) -> ApiError {
    match err {
        HistoryError::DuplicateEntry(_) => ApiError::DomainRuleViolation {
            rule: String::from("single_finalization"),
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DecreeNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Decree"),
            message: format!("Decree {id} does not exist"),
        },
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::HistoryViolation(history_err) => translate_history_error(history_err),
        CoreError::PersistenceFailure(msg) => ApiError::Internal {
            message: format!("Failed to store decree: {msg}"),
        },
    }
}
