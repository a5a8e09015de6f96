// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional execution of deletion plans.

use std::time::Duration;

use court_booking_domain::{Entity, EntityRef, GameSessionId, ScheduleId, SemesterId};
use court_booking_persistence::{EntityStore, StoreSet, Transaction, TransactionCoordinator};
use diesel::SqliteConnection;
use tracing::{debug, error, info, warn};

use crate::deadline::Deadline;
use crate::error::{CascadeError, StepFailure};
use crate::plan::{CascadeSummary, DeletionPlan};
use crate::resolver::CascadeResolver;

/// Deletes a root entity together with all of its descendants as one
/// atomic unit.
///
/// A cascade resolves its plan with plain reads, then opens exactly one
/// transaction, deletes bottom-up and commits. Any failure rolls the whole
/// transaction back. A root that does not exist is reported as
/// [`CascadeError::NotFound`] before any transaction is opened.
#[derive(Debug)]
pub struct CascadeExecutor {
    stores: StoreSet,
    coordinator: TransactionCoordinator,
    budget: Option<Duration>,
}

impl Default for CascadeExecutor {
    fn default() -> Self {
        Self::new(StoreSet::diesel())
    }
}

impl CascadeExecutor {
    #[must_use]
    pub const fn new(stores: StoreSet) -> Self {
        Self {
            stores,
            coordinator: TransactionCoordinator::new(),
            budget: None,
        }
    }

    /// Bounds how long a cascading delete may run, measured from the start
    /// of the call. The budget is checked before every read, before the
    /// transaction opens, before every delete and before the commit.
    /// Exceeding it fails the cascade with nothing deleted.
    #[must_use]
    pub const fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    #[must_use]
    pub const fn coordinator(&self) -> &TransactionCoordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn resolver(&self) -> CascadeResolver<'_> {
        CascadeResolver::new(&self.stores)
    }

    /// Deletes a semester, its schedules, their game sessions and all
    /// bookings on those sessions.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the semester does not exist.
    /// - `CascadeFailed` if any read or delete fails; nothing is deleted.
    /// - `TransactionUnavailable` if the transaction cannot be opened or
    ///   committed; nothing is deleted.
    pub fn delete_semester_cascade(
        &self,
        conn: &mut SqliteConnection,
        id: SemesterId,
    ) -> Result<CascadeSummary, CascadeError> {
        let deadline = Deadline::start(self.budget);
        let plan = self.resolve_semester(conn, id, deadline)?;
        self.execute_within(conn, &plan, deadline)
    }

    /// Deletes a schedule, its game sessions and their bookings.
    ///
    /// # Errors
    ///
    /// Same as [`CascadeExecutor::delete_semester_cascade`].
    pub fn delete_schedule_cascade(
        &self,
        conn: &mut SqliteConnection,
        id: ScheduleId,
    ) -> Result<CascadeSummary, CascadeError> {
        let deadline = Deadline::start(self.budget);
        let plan = self.resolve_schedule(conn, id, deadline)?;
        self.execute_within(conn, &plan, deadline)
    }

    /// Deletes a game session and its bookings.
    ///
    /// # Errors
    ///
    /// Same as [`CascadeExecutor::delete_semester_cascade`].
    pub fn delete_session_cascade(
        &self,
        conn: &mut SqliteConnection,
        id: GameSessionId,
    ) -> Result<CascadeSummary, CascadeError> {
        let deadline = Deadline::start(self.budget);
        let plan = self.resolve_session(conn, id, deadline)?;
        self.execute_within(conn, &plan, deadline)
    }

    /// Resolves what deleting a semester would remove, without deleting.
    ///
    /// # Errors
    ///
    /// `NotFound` if the semester does not exist, `CascadeFailed` if a read
    /// fails.
    pub fn preview_semester_cascade(
        &self,
        conn: &mut SqliteConnection,
        id: SemesterId,
    ) -> Result<DeletionPlan, CascadeError> {
        self.resolve_semester(conn, id, Deadline::unbounded())
    }

    /// Resolves what deleting a schedule would remove, without deleting.
    ///
    /// # Errors
    ///
    /// `NotFound` if the schedule does not exist, `CascadeFailed` if a read
    /// fails.
    pub fn preview_schedule_cascade(
        &self,
        conn: &mut SqliteConnection,
        id: ScheduleId,
    ) -> Result<DeletionPlan, CascadeError> {
        self.resolve_schedule(conn, id, Deadline::unbounded())
    }

    /// Resolves what deleting a game session would remove, without
    /// deleting.
    ///
    /// # Errors
    ///
    /// `NotFound` if the game session does not exist, `CascadeFailed` if a
    /// read fails.
    pub fn preview_session_cascade(
        &self,
        conn: &mut SqliteConnection,
        id: GameSessionId,
    ) -> Result<DeletionPlan, CascadeError> {
        self.resolve_session(conn, id, Deadline::unbounded())
    }

    fn resolve_semester(
        &self,
        conn: &mut SqliteConnection,
        id: SemesterId,
        deadline: Deadline,
    ) -> Result<DeletionPlan, CascadeError> {
        ensure_exists(self.stores.semesters.as_ref(), conn, id)?;
        self.resolver().within(deadline).plan_semester(conn, id)
    }

    fn resolve_schedule(
        &self,
        conn: &mut SqliteConnection,
        id: ScheduleId,
        deadline: Deadline,
    ) -> Result<DeletionPlan, CascadeError> {
        ensure_exists(self.stores.schedules.as_ref(), conn, id)?;
        self.resolver().within(deadline).plan_schedule(conn, id)
    }

    fn resolve_session(
        &self,
        conn: &mut SqliteConnection,
        id: GameSessionId,
        deadline: Deadline,
    ) -> Result<DeletionPlan, CascadeError> {
        ensure_exists(self.stores.sessions.as_ref(), conn, id)?;
        self.resolver().within(deadline).plan_session(conn, id)
    }

    /// Executes a previously resolved plan inside one transaction.
    ///
    /// The plan may be stale. A row created under a planned parent after
    /// resolution makes that parent's delete fail on its foreign key, and
    /// the cascade rolls back. A planned row that has since disappeared
    /// fails its delete with `NotFound`, which also rolls back.
    ///
    /// The budget, if any, is measured from this call.
    ///
    /// # Errors
    ///
    /// `CascadeFailed` or `TransactionUnavailable`; in both cases nothing
    /// is deleted.
    pub fn execute(
        &self,
        conn: &mut SqliteConnection,
        plan: &DeletionPlan,
    ) -> Result<CascadeSummary, CascadeError> {
        self.execute_within(conn, plan, Deadline::start(self.budget))
    }

    fn execute_within(
        &self,
        conn: &mut SqliteConnection,
        plan: &DeletionPlan,
        deadline: Deadline,
    ) -> Result<CascadeSummary, CascadeError> {
        let root = plan.root();
        deadline
            .check()
            .map_err(|source| CascadeError::CascadeFailed {
                root,
                entity: root,
                source,
            })?;

        let mut tx = self.coordinator.begin(conn).map_err(|source| {
            error!(%root, error = %source, "Could not open cascade transaction");
            CascadeError::TransactionUnavailable { root, source }
        })?;

        info!(
            %root,
            transaction = tx.sequence(),
            bookings = plan.bookings().len(),
            sessions = plan.sessions().len(),
            schedules = plan.schedules().len(),
            "Executing cascade delete"
        );

        let outcome = self.delete_all(&mut tx, plan, deadline).and_then(|()| {
            deadline
                .check()
                .map_err(|source| CascadeError::CascadeFailed {
                    root,
                    entity: root,
                    source,
                })
        });

        if let Err(err) = outcome {
            warn!(%root, error = %err, "Cascade delete failed, rolling back");
            if let Err(rollback_err) = tx.rollback() {
                error!(%root, error = %rollback_err, "Rollback of failed cascade reported an error");
            }
            return Err(err);
        }

        tx.commit().map_err(|source| {
            error!(%root, error = %source, "Could not commit cascade transaction");
            CascadeError::TransactionUnavailable { root, source }
        })?;

        let summary = plan.summary();
        info!(
            %root,
            deleted = summary.total(),
            elapsed_ms = u64::try_from(deadline.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Cascade delete committed"
        );
        Ok(summary)
    }

    fn delete_all(
        &self,
        tx: &mut Transaction<'_>,
        plan: &DeletionPlan,
        deadline: Deadline,
    ) -> Result<(), CascadeError> {
        let root = plan.root();
        delete_level(tx, self.stores.bookings.as_ref(), plan.bookings(), root, deadline)?;
        delete_level(tx, self.stores.sessions.as_ref(), plan.sessions(), root, deadline)?;
        delete_level(tx, self.stores.schedules.as_ref(), plan.schedules(), root, deadline)?;
        if let Some(semester) = plan.semester() {
            delete_level(tx, self.stores.semesters.as_ref(), &[semester], root, deadline)?;
        }
        Ok(())
    }
}

/// Confirms the root exists before anything else happens.
fn ensure_exists<E: Entity>(
    store: &dyn EntityStore<E>,
    conn: &mut SqliteConnection,
    id: E::Id,
) -> Result<(), CascadeError> {
    let entity: EntityRef = id.into();
    match store.get(conn, id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => {
            debug!(%entity, "Cascade root not found");
            Err(CascadeError::NotFound { entity })
        }
        Err(e) => Err(CascadeError::CascadeFailed {
            root: entity,
            entity,
            source: StepFailure::Store(e),
        }),
    }
}

fn delete_level<E: Entity>(
    tx: &mut Transaction<'_>,
    store: &dyn EntityStore<E>,
    ids: &[E::Id],
    root: EntityRef,
    deadline: Deadline,
) -> Result<(), CascadeError> {
    for &id in ids {
        let entity: EntityRef = id.into();
        deadline
            .check()
            .map_err(|source| CascadeError::CascadeFailed {
                root,
                entity,
                source,
            })?;
        store
            .delete(tx.connection(), id)
            .map_err(|e| CascadeError::CascadeFailed {
                root,
                entity,
                source: StepFailure::Store(e),
            })?;
        debug!(%root, %entity, "Deleted");
    }
    Ok(())
}
