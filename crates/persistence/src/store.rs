// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The per-entity repository.
//!
//! All four entity types share one repository contract, [`EntityStore`].
//! The Diesel implementation, [`DieselStore`], is stamped out once per
//! entity by `diesel_entity_store!`; the table-specific parts are the only
//! thing the macro substitutes.
//!
//! Every call takes the connection explicitly. Passing the connection of an
//! open [`crate::Transaction`] makes the call part of that transaction.

use std::fmt;
use std::marker::PhantomData;

use court_booking_domain::{Booking, Entity, GameSession, GameSessionSchedule, Semester};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{
    BookingChanges, BookingRow, GameSessionChanges, GameSessionRow, NewBookingRow,
    NewGameSessionRow, NewScheduleRow, ScheduleChanges, ScheduleRow, SemesterRow,
    SemesterValues,
};
use crate::diesel_schema::{bookings, game_session_schedules, game_sessions, semesters};
use crate::error::PersistenceError;

/// CRUD and find-by-parent access to one entity type.
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Inserts a new row and returns the stored entity.
    ///
    /// # Errors
    ///
    /// Returns `ForeignKeyViolation` if the parent does not exist.
    fn create(&self, conn: &mut SqliteConnection, new: &E::New) -> Result<E, PersistenceError>;

    /// Loads one entity, or `None` if no such row exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    fn get(&self, conn: &mut SqliteConnection, id: E::Id) -> Result<Option<E>, PersistenceError>;

    /// Loads every direct child of `parent`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    fn find_by_parent(
        &self,
        conn: &mut SqliteConnection,
        parent: E::ParentId,
    ) -> Result<Vec<E>, PersistenceError>;

    /// Overwrites the stored row with `entity`. The parent reference is
    /// never changed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row no longer exists.
    fn update(&self, conn: &mut SqliteConnection, entity: &E) -> Result<(), PersistenceError>;

    /// Deletes one row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing was deleted and `ForeignKeyViolation`
    /// if children still reference the row.
    fn delete(&self, conn: &mut SqliteConnection, id: E::Id) -> Result<(), PersistenceError>;
}

/// Diesel-backed [`EntityStore`] for entity `E`.
pub struct DieselStore<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E> DieselStore<E> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E> Default for DieselStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> fmt::Debug for DieselStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DieselStore<{}>", E::KIND)
    }
}

macro_rules! diesel_entity_store {
    (@find $conn:ident, $parent:ident, $table:ident, $key:ident, $row:ty, none) => {{
        let _: () = $parent;
        $table::table
            .order($table::$key.asc())
            .select(<$row>::as_select())
            .load::<$row>($conn)?
    }};
    (@find $conn:ident, $parent:ident, $table:ident, $key:ident, $row:ty, $parent_col:ident) => {{
        $table::table
            .filter($table::$parent_col.eq($parent.value()))
            .order($table::$key.asc())
            .select(<$row>::as_select())
            .load::<$row>($conn)?
    }};
    (
        entity: $entity:ty,
        table: $table:ident,
        key: $key:ident,
        parent: $parent_col:ident,
        row: $row:ty,
        insert: $insert:ty,
        changes: $changes:ty $(,)?
    ) => {
        impl EntityStore<$entity> for DieselStore<$entity> {
            fn create(
                &self,
                conn: &mut SqliteConnection,
                new: &<$entity as Entity>::New,
            ) -> Result<$entity, PersistenceError> {
                let values: $insert = <$insert>::try_from(new)?;
                let row: $row = diesel::insert_into($table::table)
                    .values(&values)
                    .returning(<$row>::as_returning())
                    .get_result(conn)?;
                let entity: $entity = <$entity>::try_from(row)?;

                debug!(entity = %entity.id(), "Created entity");
                Ok(entity)
            }

            fn get(
                &self,
                conn: &mut SqliteConnection,
                id: <$entity as Entity>::Id,
            ) -> Result<Option<$entity>, PersistenceError> {
                $table::table
                    .find(id.value())
                    .select(<$row>::as_select())
                    .first::<$row>(conn)
                    .optional()?
                    .map(<$entity>::try_from)
                    .transpose()
            }

            fn find_by_parent(
                &self,
                conn: &mut SqliteConnection,
                parent: <$entity as Entity>::ParentId,
            ) -> Result<Vec<$entity>, PersistenceError> {
                let rows: Vec<$row> =
                    diesel_entity_store!(@find conn, parent, $table, $key, $row, $parent_col);
                rows.into_iter().map(<$entity>::try_from).collect()
            }

            fn update(
                &self,
                conn: &mut SqliteConnection,
                entity: &$entity,
            ) -> Result<(), PersistenceError> {
                let changes: $changes = <$changes>::try_from(entity)?;
                let updated: usize = diesel::update($table::table.find(entity.id().value()))
                    .set(&changes)
                    .execute(conn)?;

                if updated == 0 {
                    return Err(PersistenceError::NotFound(format!(
                        "{} does not exist",
                        entity.id()
                    )));
                }

                debug!(entity = %entity.id(), "Updated entity");
                Ok(())
            }

            fn delete(
                &self,
                conn: &mut SqliteConnection,
                id: <$entity as Entity>::Id,
            ) -> Result<(), PersistenceError> {
                let deleted: usize =
                    diesel::delete($table::table.find(id.value())).execute(conn)?;

                if deleted == 0 {
                    return Err(PersistenceError::NotFound(format!("{id} does not exist")));
                }

                debug!(entity = %id, "Deleted entity");
                Ok(())
            }
        }
    };
}

diesel_entity_store! {
    entity: Semester,
    table: semesters,
    key: semester_id,
    parent: none,
    row: SemesterRow,
    insert: SemesterValues,
    changes: SemesterValues,
}

diesel_entity_store! {
    entity: GameSessionSchedule,
    table: game_session_schedules,
    key: schedule_id,
    parent: semester_id,
    row: ScheduleRow,
    insert: NewScheduleRow,
    changes: ScheduleChanges,
}

diesel_entity_store! {
    entity: GameSession,
    table: game_sessions,
    key: session_id,
    parent: schedule_id,
    row: GameSessionRow,
    insert: NewGameSessionRow,
    changes: GameSessionChanges,
}

diesel_entity_store! {
    entity: Booking,
    table: bookings,
    key: booking_id,
    parent: session_id,
    row: BookingRow,
    insert: NewBookingRow,
    changes: BookingChanges,
}

/// One store per entity type.
///
/// The cascade works against a `StoreSet` rather than concrete stores so a
/// single level can be swapped out, e.g. for fault injection in tests.
pub struct StoreSet {
    pub semesters: Box<dyn EntityStore<Semester>>,
    pub schedules: Box<dyn EntityStore<GameSessionSchedule>>,
    pub sessions: Box<dyn EntityStore<GameSession>>,
    pub bookings: Box<dyn EntityStore<Booking>>,
}

impl StoreSet {
    /// Diesel-backed stores for all four entity types.
    #[must_use]
    pub fn diesel() -> Self {
        Self {
            semesters: Box::new(DieselStore::<Semester>::new()),
            schedules: Box::new(DieselStore::<GameSessionSchedule>::new()),
            sessions: Box::new(DieselStore::<GameSession>::new()),
            bookings: Box::new(DieselStore::<Booking>::new()),
        }
    }
}

impl Default for StoreSet {
    fn default() -> Self {
        Self::diesel()
    }
}

impl fmt::Debug for StoreSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSet").finish_non_exhaustive()
    }
}

/// Selects the store for entity type `E` out of a [`StoreSet`].
pub trait HasStore<E: Entity> {
    fn store_for(&self) -> &dyn EntityStore<E>;
}

impl HasStore<Semester> for StoreSet {
    fn store_for(&self) -> &dyn EntityStore<Semester> {
        self.semesters.as_ref()
    }
}

impl HasStore<GameSessionSchedule> for StoreSet {
    fn store_for(&self) -> &dyn EntityStore<GameSessionSchedule> {
        self.schedules.as_ref()
    }
}

impl HasStore<GameSession> for StoreSet {
    fn store_for(&self) -> &dyn EntityStore<GameSession> {
        self.sessions.as_ref()
    }
}

impl HasStore<Booking> for StoreSet {
    fn store_for(&self) -> &dyn EntityStore<Booking> {
        self.bookings.as_ref()
    }
}
