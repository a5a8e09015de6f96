// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

use court_booking_domain::EntityRef;
use court_booking_persistence::PersistenceError;
use thiserror::Error;

/// Why a single cascade step failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepFailure {
    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] PersistenceError),
    /// The cascade ran past its time budget.
    #[error("time budget of {budget:?} exceeded")]
    DeadlineExceeded {
        /// The configured budget.
        budget: Duration,
    },
}

/// Errors returned by a cascading delete.
///
/// Every variant is terminal for the call. When one is returned the store is
/// exactly as it was before the call began; retrying is always safe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CascadeError {
    /// The root entity does not exist. No transaction was opened.
    #[error("{entity} not found")]
    NotFound {
        /// The entity that was requested.
        entity: EntityRef,
    },
    /// A read or delete failed; everything was rolled back.
    #[error("Cascade delete of {root} failed at {entity}: {source}")]
    CascadeFailed {
        /// The entity whose subtree was being deleted.
        root: EntityRef,
        /// The entity being read or deleted when the failure happened.
        entity: EntityRef,
        /// The underlying failure.
        #[source]
        source: StepFailure,
    },
    /// A transaction could not be opened or committed.
    #[error("Cascade delete of {root} could not complete its transaction: {source}")]
    TransactionUnavailable {
        /// The entity whose subtree was being deleted.
        root: EntityRef,
        /// The underlying store failure.
        #[source]
        source: PersistenceError,
    },
}

impl CascadeError {
    /// The entity the cascade was started from.
    #[must_use]
    pub const fn root(&self) -> EntityRef {
        match self {
            Self::NotFound { entity } => *entity,
            Self::CascadeFailed { root, .. } | Self::TransactionUnavailable { root, .. } => *root,
        }
    }

    /// Returns `true` for [`CascadeError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
