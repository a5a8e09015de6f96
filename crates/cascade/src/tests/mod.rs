// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod failure_tests;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use court_booking_domain::{
    Booking, BookingId, BookingWindow, Entity, GameSession, GameSessionId, GameSessionSchedule,
    Location, NewBooking, NewGameSession, NewSchedule, NewSemester, PlayerLevel, Semester,
};
use court_booking_persistence::{
    DieselStore, EntityStore, Persistence, PersistenceError, RowCounts,
};
use diesel::{RunQueryDsl, SqliteConnection};
use time::macros::{date, time};
use time::{Date, Weekday};

pub fn create_semester(persistence: &mut Persistence, name: &str) -> Semester {
    let new = NewSemester::new(
        name,
        date!(2026 - 02 - 23),
        date!(2026 - 06 - 14),
        BookingWindow {
            weekday: Weekday::Monday,
            time: time!(12:00),
        },
    )
    .expect("Valid semester");
    persistence.create::<Semester>(&new).expect("Semester created")
}

pub fn create_schedule(persistence: &mut Persistence, semester: &Semester) -> GameSessionSchedule {
    let new = NewSchedule::new(
        semester.id,
        Weekday::Wednesday,
        time!(19:00),
        time!(22:00),
        Location::new("Sports Hall", "12 Court Road"),
        30,
        6,
    )
    .expect("Valid schedule");
    persistence
        .create::<GameSessionSchedule>(&new)
        .expect("Schedule created")
}

pub fn create_session(
    persistence: &mut Persistence,
    schedule: &GameSessionSchedule,
    date: Date,
) -> GameSession {
    let new = NewGameSession::from_schedule(schedule, date).expect("Valid session");
    persistence
        .create::<GameSession>(&new)
        .expect("Session created")
}

pub fn create_booking(persistence: &mut Persistence, session: &GameSession, user_id: &str) -> Booking {
    let new = NewBooking::new(session.id, user_id, PlayerLevel::Beginner).expect("Valid booking");
    persistence.create::<Booking>(&new).expect("Booking created")
}

/// S1 → SC1 → { G1 → B1, G2 }
pub struct SmallTree {
    pub semester: Semester,
    pub schedule: GameSessionSchedule,
    pub booked_session: GameSession,
    pub empty_session: GameSession,
    pub booking: Booking,
}

pub fn seed_small_tree(persistence: &mut Persistence) -> SmallTree {
    let semester = create_semester(persistence, "Spring 2026");
    let schedule = create_schedule(persistence, &semester);
    let booked_session = create_session(persistence, &schedule, date!(2026 - 03 - 04));
    let empty_session = create_session(persistence, &schedule, date!(2026 - 03 - 11));
    let booking = create_booking(persistence, &booked_session, "player-1");
    SmallTree {
        semester,
        schedule,
        booked_session,
        empty_session,
        booking,
    }
}

/// S → { SC1 → { G1 → { B1, B2 }, G2 }, SC2 → { G3 → B3 } }
pub struct WideTree {
    pub semester: Semester,
    pub schedules: Vec<GameSessionSchedule>,
    pub sessions: Vec<GameSession>,
    pub bookings: Vec<Booking>,
}

pub fn seed_wide_tree(persistence: &mut Persistence, name: &str) -> WideTree {
    let semester = create_semester(persistence, name);
    let first = create_schedule(persistence, &semester);
    let second = create_schedule(persistence, &semester);

    let g1 = create_session(persistence, &first, date!(2026 - 03 - 04));
    let g2 = create_session(persistence, &first, date!(2026 - 03 - 11));
    let g3 = create_session(persistence, &second, date!(2026 - 03 - 18));

    let b1 = create_booking(persistence, &g1, "player-1");
    let b2 = create_booking(persistence, &g1, "player-2");
    let b3 = create_booking(persistence, &g3, "player-3");

    WideTree {
        semester,
        schedules: vec![first, second],
        sessions: vec![g1, g2, g3],
        bookings: vec![b1, b2, b3],
    }
}

/// Asserts the store holds exactly `expected` rows and no orphans.
pub fn assert_store_state(persistence: &mut Persistence, expected: RowCounts) {
    assert_eq!(persistence.row_counts().unwrap(), expected);
    assert!(
        persistence.find_orphans().unwrap().is_clean(),
        "store contains orphaned rows"
    );
}

/// Diesel store that fails selected operations a fixed number of times.
pub struct FaultyStore<E: Entity> {
    inner: DieselStore<E>,
    fail_delete_of: Option<E::Id>,
    fail_reads: bool,
    remaining: AtomicUsize,
}

impl<E: Entity> FaultyStore<E> {
    /// Fails the delete of `id` the next `times` calls.
    pub fn failing_delete(id: E::Id, times: usize) -> Self {
        Self {
            inner: DieselStore::new(),
            fail_delete_of: Some(id),
            fail_reads: false,
            remaining: AtomicUsize::new(times),
        }
    }

    /// Fails the next `times` calls of `find_by_parent`.
    pub fn failing_reads(times: usize) -> Self {
        Self {
            inner: DieselStore::new(),
            fail_delete_of: None,
            fail_reads: true,
            remaining: AtomicUsize::new(times),
        }
    }

    fn take_fault(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

fn injected() -> PersistenceError {
    PersistenceError::DatabaseError("injected fault".to_string())
}

impl<E: Entity> EntityStore<E> for FaultyStore<E>
where
    DieselStore<E>: EntityStore<E>,
{
    fn create(&self, conn: &mut SqliteConnection, new: &E::New) -> Result<E, PersistenceError> {
        self.inner.create(conn, new)
    }

    fn get(&self, conn: &mut SqliteConnection, id: E::Id) -> Result<Option<E>, PersistenceError> {
        self.inner.get(conn, id)
    }

    fn find_by_parent(
        &self,
        conn: &mut SqliteConnection,
        parent: E::ParentId,
    ) -> Result<Vec<E>, PersistenceError> {
        if self.fail_reads && self.take_fault() {
            return Err(injected());
        }
        self.inner.find_by_parent(conn, parent)
    }

    fn update(&self, conn: &mut SqliteConnection, entity: &E) -> Result<(), PersistenceError> {
        self.inner.update(conn, entity)
    }

    fn delete(&self, conn: &mut SqliteConnection, id: E::Id) -> Result<(), PersistenceError> {
        if self.fail_delete_of == Some(id) && self.take_fault() {
            return Err(injected());
        }
        self.inner.delete(conn, id)
    }
}

/// Diesel store that sleeps before selected operations.
pub struct SlowStore<E: Entity> {
    inner: DieselStore<E>,
    read_delay: Duration,
    delete_delay: Duration,
}

impl<E: Entity> SlowStore<E> {
    pub fn slow_reads(delay: Duration) -> Self {
        Self {
            inner: DieselStore::new(),
            read_delay: delay,
            delete_delay: Duration::ZERO,
        }
    }

    pub fn slow_deletes(delay: Duration) -> Self {
        Self {
            inner: DieselStore::new(),
            read_delay: Duration::ZERO,
            delete_delay: delay,
        }
    }
}

impl<E: Entity> EntityStore<E> for SlowStore<E>
where
    DieselStore<E>: EntityStore<E>,
{
    fn create(&self, conn: &mut SqliteConnection, new: &E::New) -> Result<E, PersistenceError> {
        self.inner.create(conn, new)
    }

    fn get(&self, conn: &mut SqliteConnection, id: E::Id) -> Result<Option<E>, PersistenceError> {
        self.inner.get(conn, id)
    }

    fn find_by_parent(
        &self,
        conn: &mut SqliteConnection,
        parent: E::ParentId,
    ) -> Result<Vec<E>, PersistenceError> {
        thread::sleep(self.read_delay);
        self.inner.find_by_parent(conn, parent)
    }

    fn update(&self, conn: &mut SqliteConnection, entity: &E) -> Result<(), PersistenceError> {
        self.inner.update(conn, entity)
    }

    fn delete(&self, conn: &mut SqliteConnection, id: E::Id) -> Result<(), PersistenceError> {
        thread::sleep(self.delete_delay);
        self.inner.delete(conn, id)
    }
}

/// Booking store whose deletes defer foreign key checks to commit time and
/// then leave the row in place, so the parent session's delete only fails
/// at `COMMIT`.
pub struct DeferredCheckStore {
    inner: DieselStore<Booking>,
}

impl DeferredCheckStore {
    pub fn new() -> Self {
        Self {
            inner: DieselStore::new(),
        }
    }
}

impl EntityStore<Booking> for DeferredCheckStore {
    fn create(&self, conn: &mut SqliteConnection, new: &NewBooking) -> Result<Booking, PersistenceError> {
        self.inner.create(conn, new)
    }

    fn get(
        &self,
        conn: &mut SqliteConnection,
        id: BookingId,
    ) -> Result<Option<Booking>, PersistenceError> {
        self.inner.get(conn, id)
    }

    fn find_by_parent(
        &self,
        conn: &mut SqliteConnection,
        parent: GameSessionId,
    ) -> Result<Vec<Booking>, PersistenceError> {
        self.inner.find_by_parent(conn, parent)
    }

    fn update(&self, conn: &mut SqliteConnection, entity: &Booking) -> Result<(), PersistenceError> {
        self.inner.update(conn, entity)
    }

    fn delete(&self, conn: &mut SqliteConnection, _id: BookingId) -> Result<(), PersistenceError> {
        diesel::sql_query("PRAGMA defer_foreign_keys = ON").execute(conn)?;
        Ok(())
    }
}
