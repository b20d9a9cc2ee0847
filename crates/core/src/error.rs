// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use duty_roster_domain::DomainError;

/// Errors that can occur during state transitions.
///
/// A rejected command leaves the state exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A precondition of the command failed.
    Rejected {
        /// Name of the rejected command.
        command: &'static str,
        /// The rule that was violated.
        error: DomainError,
    },
}

impl CoreError {
    /// The domain rule behind this error.
    #[must_use]
    pub const fn domain_error(&self) -> &DomainError {
        match self {
            Self::Rejected { error, .. } => error,
        }
    }

    /// Name of the rejected command.
    #[must_use]
    pub const fn command(&self) -> &'static str {
        match self {
            Self::Rejected { command, .. } => command,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { command, error } => write!(f, "{command} rejected: {error}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.domain_error())
    }
}
