// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types for the scheduling tables and their conversions to and from
//! domain entities.
//!
//! Dates and times are stored as ISO 8601 text, weekdays as days from Monday
//! (`0..=6`), capacities as integers.

use court_booking_domain::{
    Booking, BookingId, BookingWindow, GameSession, GameSessionId, GameSessionSchedule,
    Location, NewBooking, NewGameSession, NewSchedule, NewSemester, PlayerLevel, ScheduleId,
    Semester, SemesterId,
};
use diesel::prelude::*;
use num_traits::ToPrimitive;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Time, Weekday};

use crate::diesel_schema::{bookings, game_session_schedules, game_sessions, semesters};
use crate::error::PersistenceError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

fn format_date(date: Date) -> Result<String, PersistenceError> {
    date.format(DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(format!("Invalid date {date}: {e}")))
}

fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, DATE_FORMAT).map_err(|e| {
        PersistenceError::SerializationError(format!("Invalid stored date '{value}': {e}"))
    })
}

fn format_time(time: Time) -> Result<String, PersistenceError> {
    time.format(TIME_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(format!("Invalid time {time}: {e}")))
}

fn parse_time(value: &str) -> Result<Time, PersistenceError> {
    Time::parse(value, TIME_FORMAT).map_err(|e| {
        PersistenceError::SerializationError(format!("Invalid stored time '{value}': {e}"))
    })
}

fn weekday_to_db(weekday: Weekday) -> i32 {
    i32::from(weekday.number_days_from_monday())
}

fn weekday_from_db(value: i32) -> Result<Weekday, PersistenceError> {
    let offset: u8 = value
        .to_u8()
        .filter(|offset| *offset < 7)
        .ok_or_else(|| {
            PersistenceError::SerializationError(format!("Invalid stored weekday {value}"))
        })?;
    Ok(Weekday::Monday.nth_next(offset))
}

fn capacity_from_db(value: i32) -> Result<u16, PersistenceError> {
    value.to_u16().ok_or_else(|| {
        PersistenceError::SerializationError(format!("Invalid stored capacity {value}"))
    })
}

fn player_level_from_db(value: &str) -> Result<PlayerLevel, PersistenceError> {
    value
        .parse()
        .map_err(|e| PersistenceError::SerializationError(format!("{e}")))
}

// ============================================================================
// Semesters
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = semesters)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SemesterRow {
    pub semester_id: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub booking_open_weekday: i32,
    pub booking_open_time: String,
}

/// Column values written on insert and on update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = semesters)]
pub struct SemesterValues {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub booking_open_weekday: i32,
    pub booking_open_time: String,
}

impl SemesterValues {
    fn build(
        name: &str,
        start_date: Date,
        end_date: Date,
        booking_window: BookingWindow,
    ) -> Result<Self, PersistenceError> {
        Ok(Self {
            name: name.to_string(),
            start_date: format_date(start_date)?,
            end_date: format_date(end_date)?,
            booking_open_weekday: weekday_to_db(booking_window.weekday),
            booking_open_time: format_time(booking_window.time)?,
        })
    }
}

impl TryFrom<&NewSemester> for SemesterValues {
    type Error = PersistenceError;

    fn try_from(new: &NewSemester) -> Result<Self, Self::Error> {
        Self::build(&new.name, new.start_date, new.end_date, new.booking_window)
    }
}

impl TryFrom<&Semester> for SemesterValues {
    type Error = PersistenceError;

    fn try_from(semester: &Semester) -> Result<Self, Self::Error> {
        Self::build(
            &semester.name,
            semester.start_date,
            semester.end_date,
            semester.booking_window,
        )
    }
}

impl TryFrom<SemesterRow> for Semester {
    type Error = PersistenceError;

    fn try_from(row: SemesterRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SemesterId::new(row.semester_id),
            name: row.name,
            start_date: parse_date(&row.start_date)?,
            end_date: parse_date(&row.end_date)?,
            booking_window: BookingWindow {
                weekday: weekday_from_db(row.booking_open_weekday)?,
                time: parse_time(&row.booking_open_time)?,
            },
        })
    }
}

// ============================================================================
// Game session schedules
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = game_session_schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ScheduleRow {
    pub schedule_id: i64,
    pub semester_id: i64,
    pub weekday: i32,
    pub start_time: String,
    pub end_time: String,
    pub location_name: String,
    pub location_address: String,
    pub capacity: i32,
    pub casual_capacity: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = game_session_schedules)]
pub struct NewScheduleRow {
    pub semester_id: i64,
    pub weekday: i32,
    pub start_time: String,
    pub end_time: String,
    pub location_name: String,
    pub location_address: String,
    pub capacity: i32,
    pub casual_capacity: i32,
}

/// Updatable columns. The owning semester never changes.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = game_session_schedules)]
pub struct ScheduleChanges {
    pub weekday: i32,
    pub start_time: String,
    pub end_time: String,
    pub location_name: String,
    pub location_address: String,
    pub capacity: i32,
    pub casual_capacity: i32,
}

impl TryFrom<&NewSchedule> for NewScheduleRow {
    type Error = PersistenceError;

    fn try_from(new: &NewSchedule) -> Result<Self, Self::Error> {
        Ok(Self {
            semester_id: new.semester.value(),
            weekday: weekday_to_db(new.weekday),
            start_time: format_time(new.start_time)?,
            end_time: format_time(new.end_time)?,
            location_name: new.location.name.clone(),
            location_address: new.location.address.clone(),
            capacity: i32::from(new.capacity),
            casual_capacity: i32::from(new.casual_capacity),
        })
    }
}

impl TryFrom<&GameSessionSchedule> for ScheduleChanges {
    type Error = PersistenceError;

    fn try_from(schedule: &GameSessionSchedule) -> Result<Self, Self::Error> {
        Ok(Self {
            weekday: weekday_to_db(schedule.weekday),
            start_time: format_time(schedule.start_time)?,
            end_time: format_time(schedule.end_time)?,
            location_name: schedule.location.name.clone(),
            location_address: schedule.location.address.clone(),
            capacity: i32::from(schedule.capacity),
            casual_capacity: i32::from(schedule.casual_capacity),
        })
    }
}

impl TryFrom<ScheduleRow> for GameSessionSchedule {
    type Error = PersistenceError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ScheduleId::new(row.schedule_id),
            semester: SemesterId::new(row.semester_id),
            weekday: weekday_from_db(row.weekday)?,
            start_time: parse_time(&row.start_time)?,
            end_time: parse_time(&row.end_time)?,
            location: Location {
                name: row.location_name,
                address: row.location_address,
            },
            capacity: capacity_from_db(row.capacity)?,
            casual_capacity: capacity_from_db(row.casual_capacity)?,
        })
    }
}

// ============================================================================
// Game sessions
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = game_sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameSessionRow {
    pub session_id: i64,
    pub schedule_id: i64,
    pub session_date: String,
    pub start_time: String,
    pub end_time: String,
    pub location_name: String,
    pub location_address: String,
    pub capacity: i32,
    pub casual_capacity: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = game_sessions)]
pub struct NewGameSessionRow {
    pub schedule_id: i64,
    pub session_date: String,
    pub start_time: String,
    pub end_time: String,
    pub location_name: String,
    pub location_address: String,
    pub capacity: i32,
    pub casual_capacity: i32,
}

/// Updatable columns. The owning schedule never changes.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = game_sessions)]
pub struct GameSessionChanges {
    pub session_date: String,
    pub start_time: String,
    pub end_time: String,
    pub location_name: String,
    pub location_address: String,
    pub capacity: i32,
    pub casual_capacity: i32,
}

impl TryFrom<&NewGameSession> for NewGameSessionRow {
    type Error = PersistenceError;

    fn try_from(new: &NewGameSession) -> Result<Self, Self::Error> {
        Ok(Self {
            schedule_id: new.schedule.value(),
            session_date: format_date(new.date)?,
            start_time: format_time(new.start_time)?,
            end_time: format_time(new.end_time)?,
            location_name: new.location.name.clone(),
            location_address: new.location.address.clone(),
            capacity: i32::from(new.capacity),
            casual_capacity: i32::from(new.casual_capacity),
        })
    }
}

impl TryFrom<&GameSession> for GameSessionChanges {
    type Error = PersistenceError;

    fn try_from(session: &GameSession) -> Result<Self, Self::Error> {
        Ok(Self {
            session_date: format_date(session.date)?,
            start_time: format_time(session.start_time)?,
            end_time: format_time(session.end_time)?,
            location_name: session.location.name.clone(),
            location_address: session.location.address.clone(),
            capacity: i32::from(session.capacity),
            casual_capacity: i32::from(session.casual_capacity),
        })
    }
}

impl TryFrom<GameSessionRow> for GameSession {
    type Error = PersistenceError;

    fn try_from(row: GameSessionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: GameSessionId::new(row.session_id),
            schedule: ScheduleId::new(row.schedule_id),
            date: parse_date(&row.session_date)?,
            start_time: parse_time(&row.start_time)?,
            end_time: parse_time(&row.end_time)?,
            location: Location {
                name: row.location_name,
                address: row.location_address,
            },
            capacity: capacity_from_db(row.capacity)?,
            casual_capacity: capacity_from_db(row.casual_capacity)?,
        })
    }
}

// ============================================================================
// Bookings
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BookingRow {
    pub booking_id: i64,
    pub session_id: i64,
    pub user_id: String,
    pub player_level: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBookingRow {
    pub session_id: i64,
    pub user_id: String,
    pub player_level: String,
}

/// Updatable columns. The booked session never changes.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bookings)]
pub struct BookingChanges {
    pub user_id: String,
    pub player_level: String,
}

impl TryFrom<&NewBooking> for NewBookingRow {
    type Error = PersistenceError;

    fn try_from(new: &NewBooking) -> Result<Self, Self::Error> {
        Ok(Self {
            session_id: new.session.value(),
            user_id: new.user_id.clone(),
            player_level: new.player_level.as_str().to_string(),
        })
    }
}

impl TryFrom<&Booking> for BookingChanges {
    type Error = PersistenceError;

    fn try_from(booking: &Booking) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: booking.user_id.clone(),
            player_level: booking.player_level.as_str().to_string(),
        })
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = PersistenceError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BookingId::new(row.booking_id),
            session: GameSessionId::new(row.session_id),
            player_level: player_level_from_db(&row.player_level)?,
            user_id: row.user_id,
            created_at: row.created_at,
        })
    }
}
