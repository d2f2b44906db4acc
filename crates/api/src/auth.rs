// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor roles and authorization checks.
//!
//! How an actor proves who they are is left to the caller. This module only
//! decides what an already identified actor may do.

use decrees_audit::Actor;
use std::str::FromStr;

use crate::error::AuthError;

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Operators with corrective authority.
    ///
    /// Admins may do everything a councillor may, and additionally:
    /// - force a decree's status
    /// - trigger a sweep by hand
    /// - reload the rules and roster
    Admin,
    /// Council members acting through their seat.
    ///
    /// Councillors may author, edit, open, vote on, and delete decrees.
    Councillor,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Councillor => "councillor",
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "councillor" => Ok(Self::Councillor),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown role '{s}'"),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identified actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this actor into the form recorded in decree history.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role.as_str().to_string())
    }
}

/// Builds an actor from caller-supplied identity fields.
///
/// # Errors
///
/// Returns an error if the actor id is blank or the role is unknown.
pub fn authenticate(actor_id: &str, role: &str) -> Result<AuthenticatedActor, AuthError> {
    let actor_id: &str = actor_id.trim();
    if actor_id.is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    let role: Role = role.parse()?;
    Ok(AuthenticatedActor::new(actor_id.to_string(), role))
}

/// Role checks for the privileged operations.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that an actor may force a decree's status.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an admin.
    pub fn authorize_force_status(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "force_status")
    }

    /// Checks that an actor may run a sweep by hand.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an admin.
    pub fn authorize_sweep(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "sweep")
    }

    /// Checks that an actor may reload configuration.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an admin.
    pub fn authorize_reload_config(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "reload_config")
    }

    fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Councillor => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: Role::Admin.as_str().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate_rejects_blank_actor() {
        let result = authenticate("  ", "admin");

        assert!(matches!(
            result,
            Err(AuthError::AuthenticationFailed { .. })
        ));
    }

    #[test]
    fn test_authenticate_rejects_unknown_role() {
        assert!(authenticate("clerk", "mayor").is_err());
    }

    #[test]
    fn test_councillor_cannot_force_status() {
        let actor = AuthenticatedActor::new(String::from("ana"), Role::Councillor);

        let result = AuthorizationService::authorize_force_status(&actor);

        assert_eq!(
            result,
            Err(AuthError::Unauthorized {
                action: String::from("force_status"),
                required_role: String::from("admin"),
            })
        );
    }

    #[test]
    fn test_admin_actor_is_recorded_with_role() {
        let actor = AuthenticatedActor::new(String::from("clerk"), Role::Admin);

        let audit: Actor = actor.to_audit_actor();

        assert_eq!(audit.id, "clerk");
        assert_eq!(audit.actor_type, "admin");
    }
}
