// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use duty_roster::CoreError;
use duty_roster_domain::DomainError;

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
        std::fmt::Display::fmt(&ApiError::from(self.clone()), f)
    }
}

impl std::error::Error for AuthError {}

/// Errors returned by every handler.
///
/// `DomainRuleViolation.rule` is a stable snake_case name clients can match on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor's role does not allow the action.
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
                write!(f, "Actor rejected: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "'{action}' needs the {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Rule '{rule}' violated: {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Bad {field}: {message}")
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

fn rule(rule: &str, err: &DomainError) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: String::from(rule),
        message: err.to_string(),
    }
}

fn input(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: String::from(field),
        message: err.to_string(),
    }
}

fn not_found(resource_type: &str, err: &DomainError) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from(resource_type),
        message: err.to_string(),
    }
}

/// Maps a domain error onto a rule name, input field or missing resource.
#[must_use]
pub fn translate_domain_error(err: &DomainError) -> ApiError {
    match err {
        DomainError::NoMembers => rule("members_present", err),
        DomainError::NoSlots => rule("period_initialized", err),
        DomainError::SlotNotFound { .. } => not_found("Slot", err),
        DomainError::SlotAlreadyAssigned { .. } => rule("slot_free", err),
        DomainError::QuotaExhausted { .. } => rule("quota_available", err),
        DomainError::NoActiveOrder => rule("order_drawn", err),
        DomainError::InvalidOrder { .. } => input("order", err),
        DomainError::HistoryEmpty => rule("history_available", err),
        DomainError::InvalidPreferenceId(_) => input("preferences", err),
        DomainError::MemberNotFound(_) => not_found("Member", err),
        DomainError::DuplicateMember(_) => rule("unique_member", err),
        DomainError::InvalidMemberName(_) => input("member", err),
        DomainError::InvalidPeriod { .. } => input("period", err),
        DomainError::SlotNotAssigned { .. } => rule("slot_assigned", err),
        DomainError::AllocationInProgress { .. } => rule("allocation_not_started", err),
        DomainError::NoRedistributionRecipients { .. } => rule("recipients_available", err),
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: &CoreError) -> ApiError {
    translate_domain_error(err.domain_error())
}
