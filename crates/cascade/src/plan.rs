// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use court_booking_domain::{BookingId, EntityKind, EntityRef, GameSessionId, ScheduleId, SemesterId};
use serde::Serialize;

/// The fully resolved set of entities a cascade will delete.
///
/// Ids are grouped by type. [`DeletionPlan::steps`] yields them in deletion
/// order: bookings, game sessions, schedules, then the semester, so a parent
/// is never deleted while one of its children still exists. Within one level
/// the order is by id but carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionPlan {
    root: EntityRef,
    bookings: Vec<BookingId>,
    sessions: Vec<GameSessionId>,
    schedules: Vec<ScheduleId>,
    semester: Option<SemesterId>,
}

impl DeletionPlan {
    pub(crate) fn new(root: EntityRef) -> Self {
        Self {
            root,
            bookings: Vec::new(),
            sessions: Vec::new(),
            schedules: Vec::new(),
            semester: None,
        }
    }

    pub(crate) fn push_booking(&mut self, id: BookingId) {
        self.bookings.push(id);
    }

    pub(crate) fn push_session(&mut self, id: GameSessionId) {
        self.sessions.push(id);
    }

    pub(crate) fn push_schedule(&mut self, id: ScheduleId) {
        self.schedules.push(id);
    }

    pub(crate) const fn set_semester(&mut self, id: SemesterId) {
        self.semester = Some(id);
    }

    /// The entity whose subtree this plan removes.
    #[must_use]
    pub const fn root(&self) -> EntityRef {
        self.root
    }

    #[must_use]
    pub fn bookings(&self) -> &[BookingId] {
        &self.bookings
    }

    #[must_use]
    pub fn sessions(&self) -> &[GameSessionId] {
        &self.sessions
    }

    #[must_use]
    pub fn schedules(&self) -> &[ScheduleId] {
        &self.schedules
    }

    #[must_use]
    pub const fn semester(&self) -> Option<SemesterId> {
        self.semester
    }

    /// Total number of deletions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bookings.len()
            + self.sessions.len()
            + self.schedules.len()
            + usize::from(self.semester.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every deletion in execution order, children before parents.
    pub fn steps(&self) -> impl Iterator<Item = EntityRef> + '_ {
        self.bookings
            .iter()
            .copied()
            .map(EntityRef::from)
            .chain(self.sessions.iter().copied().map(EntityRef::from))
            .chain(self.schedules.iter().copied().map(EntityRef::from))
            .chain(self.semester.into_iter().map(EntityRef::from))
    }

    /// Number of deletions of the given kind.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Booking => self.bookings.len(),
            EntityKind::GameSession => self.sessions.len(),
            EntityKind::Schedule => self.schedules.len(),
            EntityKind::Semester => usize::from(self.semester.is_some()),
        }
    }

    #[must_use]
    pub fn summary(&self) -> CascadeSummary {
        CascadeSummary {
            root: self.root,
            semesters: self.count(EntityKind::Semester),
            schedules: self.count(EntityKind::Schedule),
            sessions: self.count(EntityKind::GameSession),
            bookings: self.count(EntityKind::Booking),
        }
    }
}

/// Per-type counts of a plan, reported after a successful cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CascadeSummary {
    pub root: EntityRef,
    pub semesters: usize,
    pub schedules: usize,
    pub sessions: usize,
    pub bookings: usize,
}

impl CascadeSummary {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.semesters + self.schedules + self.sessions + self.bookings
    }
}
