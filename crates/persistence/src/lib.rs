// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the court booking system.
//!
//! This crate stores the scheduling hierarchy (semesters, schedules, game
//! sessions, bookings) in `SQLite` through Diesel and provides the
//! primitives the cascade is built from:
//!
//! - [`EntityStore`]: one generic repository contract, instantiated per
//!   entity type as [`DieselStore`]
//! - [`TransactionCoordinator`]: explicit begin/commit/rollback with a
//!   rollback-on-drop guard
//! - [`find_orphans`]: a read-only check of the parent/child invariant
//!
//! ## Referential integrity
//!
//! Every child table references its parent with `ON DELETE RESTRICT` and
//! foreign key enforcement is verified when a connection is opened. A parent
//! row therefore cannot be deleted while any child still references it; the
//! cascade deletes children first and relies on this check to reject stale
//! deletion plans.
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated in-memory `SQLite` databases
//! - Each `new_in_memory()` call gets its own database

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use court_booking_domain::Entity;
use tracing::info;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod integrity;
mod store;
mod transaction;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use integrity::{OrphanReport, RowCounts, find_orphans, row_counts};
pub use store::{DieselStore, EntityStore, HasStore, StoreSet};
pub use transaction::{Transaction, TransactionCoordinator};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter owning the database connection.
///
/// Single-entity CRUD goes through the Diesel stores. Multi-entity work
/// (the cascade) borrows the connection via [`Persistence::connection`] and
/// brings its own stores and transaction coordinator.
pub struct Persistence {
    conn: SqliteConnection,
    stores: StoreSet,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so tests are
    /// isolated from one another.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            stores: StoreSet::diesel(),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;

        // Enable WAL mode for better read concurrency
        backend::enable_wal_mode(&mut conn)?;

        backend::verify_foreign_key_enforcement(&mut conn)?;

        info!(path = path_str, "Opened file-backed database");
        Ok(Self {
            conn,
            stores: StoreSet::diesel(),
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// The underlying connection, for units of work spanning several stores.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    // ========================================================================
    // Single-entity operations
    // ========================================================================

    /// Creates an entity of type `E`.
    ///
    /// # Errors
    ///
    /// Returns `ForeignKeyViolation` if the parent does not exist, or any
    /// database error.
    pub fn create<E: Entity>(&mut self, new: &E::New) -> Result<E, PersistenceError>
    where
        StoreSet: HasStore<E>,
    {
        HasStore::<E>::store_for(&self.stores).create(&mut self.conn, new)
    }

    /// Loads an entity of type `E`, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get<E: Entity>(&mut self, id: E::Id) -> Result<Option<E>, PersistenceError>
    where
        StoreSet: HasStore<E>,
    {
        HasStore::<E>::store_for(&self.stores).get(&mut self.conn, id)
    }

    /// Loads every child of `parent`. For semesters (`parent = ()`) this
    /// lists all semesters.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_by_parent<E: Entity>(
        &mut self,
        parent: E::ParentId,
    ) -> Result<Vec<E>, PersistenceError>
    where
        StoreSet: HasStore<E>,
    {
        HasStore::<E>::store_for(&self.stores).find_by_parent(&mut self.conn, parent)
    }

    /// Overwrites an existing entity.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entity no longer exists.
    pub fn update<E: Entity>(&mut self, entity: &E) -> Result<(), PersistenceError>
    where
        StoreSet: HasStore<E>,
    {
        HasStore::<E>::store_for(&self.stores).update(&mut self.conn, entity)
    }

    /// Deletes a single entity without touching its children.
    ///
    /// Only succeeds for entities with no children; use the cascade to
    /// remove a whole subtree.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entity does not exist and
    /// `ForeignKeyViolation` if children still reference it.
    pub fn delete<E: Entity>(&mut self, id: E::Id) -> Result<(), PersistenceError>
    where
        StoreSet: HasStore<E>,
    {
        HasStore::<E>::store_for(&self.stores).delete(&mut self.conn, id)
    }

    // ========================================================================
    // Integrity
    // ========================================================================

    /// Counts rows whose parent is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_orphans(&mut self) -> Result<OrphanReport, PersistenceError> {
        integrity::find_orphans(&mut self.conn)
    }

    /// Counts stored rows per entity table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn row_counts(&mut self) -> Result<RowCounts, PersistenceError> {
        integrity::row_counts(&mut self.conn)
    }
}
