// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use duty_roster_audit::{Actor, ActorKind};
use tracing::debug;

use crate::error::AuthError;

/// Actor roles for authorization.
///
/// Roles apply to operators at the desk, never to roster members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: operators who run the session.
    ///
    /// Admins may:
    /// - initialise a period
    /// - draw quotas and the selection order, or set the order by hand
    /// - assign in manual mode and release slots
    /// - anything a picker may do
    Admin,
    /// Picker role: operators entering picks as members call them out.
    ///
    /// Pickers may assign on turn, pass, undo, set absence and preferences,
    /// and resume auto-fill.
    Picker,
}

impl Role {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Picker => "Picker",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "picker" => Ok(Self::Picker),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown role '{s}'"),
            }),
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), ActorKind::Operator)
    }
}

/// Stub authentication function.
///
/// Accepts any non-empty actor id. Credential checks belong to whatever
/// front end hosts the desk.
///
/// # Errors
///
/// Returns an error if the actor id is empty.
pub fn authenticate_stub(actor_id: String, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if actor_id.trim().is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    debug!(actor = %actor_id, role = %role, "Authenticated actor");
    Ok(AuthenticatedActor::new(actor_id, role))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks an actor's role against the role an action requires.
    ///
    /// Admin satisfies every requirement; Picker satisfies only Picker.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor's role is insufficient.
    pub fn authorize(
        actor: &AuthenticatedActor,
        action: &str,
        required: Role,
    ) -> Result<(), AuthError> {
        let allowed: bool = match (actor.role, required) {
            (Role::Admin, _) | (Role::Picker, Role::Picker) => true,
            (Role::Picker, Role::Admin) => false,
        };
        debug!(actor = %actor.id, role = %actor.role, action, allowed, "Authorization check");
        if allowed {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from(required.as_str()),
            })
        }
    }

    /// Checks if an actor may initialise a period.
    ///
    /// Only Admin actors may initialise periods.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_init_period(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::authorize(actor, "init_period", Role::Admin)
    }

    /// Checks if an actor may draw quotas.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_draw_quotas(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::authorize(actor, "draw_quotas", Role::Admin)
    }

    /// Checks if an actor may draw or set the selection order.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_order(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::authorize(actor, "set_order", Role::Admin)
    }

    /// Checks if an actor may assign a slot outside the turn order.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manual_assign(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::authorize(actor, "manual_assign", Role::Admin)
    }

    /// Checks if an actor may release a bound slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_release(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::authorize(actor, "release_slot", Role::Admin)
    }
}
