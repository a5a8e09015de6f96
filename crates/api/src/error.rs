// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use court_booking_cascade::CascadeError;
use court_booking_domain::{DomainError, EntityRef};
use court_booking_persistence::PersistenceError;
use thiserror::Error;
use tracing::warn;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        action: String,
        required_role: String,
    },
}

/// API-level errors.
///
/// These are distinct from domain, persistence and cascade errors and
/// represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor does not have permission.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Builds a `ResourceNotFound` for a missing entity.
    #[must_use]
    pub fn not_found(entity: EntityRef) -> Self {
        Self::ResourceNotFound {
            resource_type: capitalize(entity.kind.as_str()),
            message: format!("{entity} does not exist"),
        }
    }
}

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

/// Translates a domain validation error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let field: &str = match &err {
        DomainError::InvalidName(_) => "name",
        DomainError::InvalidDateRange { .. } => "end_date",
        DomainError::InvalidTimeRange { .. } => "end_time",
        DomainError::InvalidCapacity { .. } => "casual_capacity",
        DomainError::InvalidLocation(_) => "location",
        DomainError::InvalidUserReference(_) => "user_id",
        DomainError::InvalidPlayerLevel(_) => "player_level",
        DomainError::WeekdayMismatch { .. } => "date",
    };
    ApiError::InvalidInput {
        field: String::from(field),
        message: err.to_string(),
    }
}

/// Translates a persistence error into an API error.
///
/// Store details are not exposed to callers.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message,
        },
        other => {
            warn!(error = %other, "Persistence operation failed");
            ApiError::Internal {
                message: String::from("The operation could not be completed"),
            }
        }
    }
}

/// Translates a cascade error into an API error.
///
/// Only a missing root is reported as such. Every other failure is an
/// internal error; the cascade has already been rolled back and the cause
/// is logged here.
#[must_use]
pub fn translate_cascade_error(err: CascadeError) -> ApiError {
    match err {
        CascadeError::NotFound { entity } => ApiError::not_found(entity),
        other => {
            warn!(root = %other.root(), error = %other, "Cascade delete failed");
            ApiError::Internal {
                message: format!(
                    "Deleting {} failed; nothing was deleted and the request may be retried",
                    other.root()
                ),
            }
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
