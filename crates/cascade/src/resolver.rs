// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only discovery of everything below a root entity.

use court_booking_domain::{Entity, EntityRef, GameSessionId, ScheduleId, SemesterId};
use court_booking_persistence::{PersistenceError, StoreSet};
use diesel::SqliteConnection;
use tracing::debug;

use crate::deadline::Deadline;
use crate::error::{CascadeError, StepFailure};
use crate::plan::DeletionPlan;

/// Walks the hierarchy breadth-first, one level at a time, and records
/// every descendant of a root.
///
/// The resolver never writes. It does not check that the root itself
/// exists; an absent root yields a plan holding only the root.
#[derive(Debug, Clone, Copy)]
pub struct CascadeResolver<'s> {
    stores: &'s StoreSet,
    deadline: Deadline,
}

impl<'s> CascadeResolver<'s> {
    #[must_use]
    pub fn new(stores: &'s StoreSet) -> Self {
        Self {
            stores,
            deadline: Deadline::unbounded(),
        }
    }

    /// Stops resolution once `deadline` has passed. Checked before every
    /// read.
    pub(crate) const fn within(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Resolves every schedule, game session and booking of a semester.
    ///
    /// # Errors
    ///
    /// Returns `CascadeFailed` naming the parent whose children could not
    /// be read.
    pub fn plan_semester(
        &self,
        conn: &mut SqliteConnection,
        id: SemesterId,
    ) -> Result<DeletionPlan, CascadeError> {
        let root = EntityRef::from(id);
        let mut plan = DeletionPlan::new(root);

        self.check_deadline(root, id.into())?;
        let schedule_ids: Vec<ScheduleId> = self
            .stores
            .schedules
            .find_by_parent(conn, id)
            .map_err(|source| read_failed(root, id.into(), source))?
            .iter()
            .map(Entity::id)
            .collect();

        self.expand_schedules(conn, root, &mut plan, &schedule_ids)?;
        plan.set_semester(id);

        debug!(%root, steps = plan.len(), "Resolved deletion plan");
        Ok(plan)
    }

    /// Resolves every game session and booking of one schedule.
    ///
    /// # Errors
    ///
    /// Returns `CascadeFailed` naming the parent whose children could not
    /// be read.
    pub fn plan_schedule(
        &self,
        conn: &mut SqliteConnection,
        id: ScheduleId,
    ) -> Result<DeletionPlan, CascadeError> {
        let root = EntityRef::from(id);
        let mut plan = DeletionPlan::new(root);
        self.expand_schedules(conn, root, &mut plan, &[id])?;
        debug!(%root, steps = plan.len(), "Resolved deletion plan");
        Ok(plan)
    }

    /// Resolves every booking of one game session.
    ///
    /// # Errors
    ///
    /// Returns `CascadeFailed` if the bookings could not be read.
    pub fn plan_session(
        &self,
        conn: &mut SqliteConnection,
        id: GameSessionId,
    ) -> Result<DeletionPlan, CascadeError> {
        let root = EntityRef::from(id);
        let mut plan = DeletionPlan::new(root);
        self.expand_sessions(conn, root, &mut plan, &[id])?;
        debug!(%root, steps = plan.len(), "Resolved deletion plan");
        Ok(plan)
    }

    fn expand_schedules(
        &self,
        conn: &mut SqliteConnection,
        root: EntityRef,
        plan: &mut DeletionPlan,
        schedule_ids: &[ScheduleId],
    ) -> Result<(), CascadeError> {
        let mut session_ids: Vec<GameSessionId> = Vec::new();
        for &schedule_id in schedule_ids {
            self.check_deadline(root, schedule_id.into())?;
            let sessions = self
                .stores
                .sessions
                .find_by_parent(conn, schedule_id)
                .map_err(|source| read_failed(root, schedule_id.into(), source))?;
            session_ids.extend(sessions.iter().map(Entity::id));
        }

        self.expand_sessions(conn, root, plan, &session_ids)?;
        for &schedule_id in schedule_ids {
            plan.push_schedule(schedule_id);
        }
        Ok(())
    }

    fn expand_sessions(
        &self,
        conn: &mut SqliteConnection,
        root: EntityRef,
        plan: &mut DeletionPlan,
        session_ids: &[GameSessionId],
    ) -> Result<(), CascadeError> {
        for &session_id in session_ids {
            self.check_deadline(root, session_id.into())?;
            let bookings = self
                .stores
                .bookings
                .find_by_parent(conn, session_id)
                .map_err(|source| read_failed(root, session_id.into(), source))?;
            for booking in &bookings {
                plan.push_booking(booking.id);
            }
        }

        for &session_id in session_ids {
            plan.push_session(session_id);
        }
        Ok(())
    }

    fn check_deadline(&self, root: EntityRef, entity: EntityRef) -> Result<(), CascadeError> {
        self.deadline
            .check()
            .map_err(|source| CascadeError::CascadeFailed {
                root,
                entity,
                source,
            })
    }
}

fn read_failed(root: EntityRef, entity: EntityRef, source: PersistenceError) -> CascadeError {
    CascadeError::CascadeFailed {
        root,
        entity,
        source: StepFailure::Store(source),
    }
}
