// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only checks of the parent/child invariant.
//!
//! With foreign keys enforced these counts are always zero; the queries exist
//! so the invariant can be asserted from tests and admin tooling without
//! trusting the enforcement.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::diesel_schema::{bookings, game_session_schedules, game_sessions, semesters};
use crate::error::PersistenceError;

/// Rows whose parent reference points at nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrphanReport {
    pub schedules_without_semester: i64,
    pub sessions_without_schedule: i64,
    pub bookings_without_session: i64,
}

impl OrphanReport {
    /// Returns `true` if no orphaned rows were found.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.schedules_without_semester == 0
            && self.sessions_without_schedule == 0
            && self.bookings_without_session == 0
    }
}

/// Number of stored rows per entity table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts {
    pub semesters: i64,
    pub schedules: i64,
    pub sessions: i64,
    pub bookings: i64,
}

impl RowCounts {
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.semesters + self.schedules + self.sessions + self.bookings
    }
}

/// Counts child rows whose parent row is missing.
///
/// # Errors
///
/// Returns an error if any query fails.
pub fn find_orphans(conn: &mut SqliteConnection) -> Result<OrphanReport, PersistenceError> {
    let schedules_without_semester: i64 = game_session_schedules::table
        .left_join(semesters::table)
        .filter(semesters::semester_id.nullable().is_null())
        .count()
        .get_result(conn)?;

    let sessions_without_schedule: i64 = game_sessions::table
        .left_join(game_session_schedules::table)
        .filter(game_session_schedules::schedule_id.nullable().is_null())
        .count()
        .get_result(conn)?;

    let bookings_without_session: i64 = bookings::table
        .left_join(game_sessions::table)
        .filter(game_sessions::session_id.nullable().is_null())
        .count()
        .get_result(conn)?;

    Ok(OrphanReport {
        schedules_without_semester,
        sessions_without_schedule,
        bookings_without_session,
    })
}

/// Counts the rows of every entity table.
///
/// # Errors
///
/// Returns an error if any query fails.
pub fn row_counts(conn: &mut SqliteConnection) -> Result<RowCounts, PersistenceError> {
    Ok(RowCounts {
        semesters: semesters::table.count().get_result(conn)?,
        schedules: game_session_schedules::table.count().get_result(conn)?,
        sessions: game_sessions::table.count().get_result(conn)?,
        bookings: bookings::table.count().get_result(conn)?,
    })
}
