// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as `YYYY-MM-DD`, times of day as `HH:MM` and weekdays by
//! their English name.

use court_booking_cascade::{CascadeSummary, DeletionPlan};
use court_booking_domain::{Booking, EntityKind, EntityRef, GameSession, GameSessionSchedule, Semester};
use serde::{Deserialize, Serialize};
use time::Time;

/// API request to create a new semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSemesterRequest {
    pub name: String,
    /// First day of the semester (ISO 8601).
    pub start_date: String,
    /// Last day of the semester (ISO 8601).
    pub end_date: String,
    /// Weekday on which bookings for the following week open.
    pub booking_weekday: String,
    /// Time of day at which bookings open.
    pub booking_time: String,
}

/// API request to add a recurring weekly schedule to a semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub weekday: String,
    pub start_time: String,
    pub end_time: String,
    pub location_name: String,
    pub location_address: String,
    pub capacity: u16,
    /// Places reserved for casual (non-member) players.
    pub casual_capacity: u16,
}

/// API request to generate one game session of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// The session date; must fall on the schedule's weekday and inside the
    /// semester.
    pub date: String,
}

/// API request to book a place on a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub user_id: String,
    pub player_level: String,
}

/// A semester as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterInfo {
    pub semester_id: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub booking_weekday: String,
    pub booking_time: String,
}

impl From<&Semester> for SemesterInfo {
    fn from(semester: &Semester) -> Self {
        Self {
            semester_id: semester.id.value(),
            name: semester.name.clone(),
            start_date: semester.start_date.to_string(),
            end_date: semester.end_date.to_string(),
            booking_weekday: semester.booking_window.weekday.to_string(),
            booking_time: format_time(semester.booking_window.time),
        }
    }
}

/// API response listing every semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSemestersResponse {
    pub semesters: Vec<SemesterInfo>,
}

/// A schedule as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInfo {
    pub schedule_id: i64,
    pub semester_id: i64,
    pub weekday: String,
    pub start_time: String,
    pub end_time: String,
    pub location_name: String,
    pub location_address: String,
    pub capacity: u16,
    pub casual_capacity: u16,
}

impl From<&GameSessionSchedule> for ScheduleInfo {
    fn from(schedule: &GameSessionSchedule) -> Self {
        Self {
            schedule_id: schedule.id.value(),
            semester_id: schedule.semester.value(),
            weekday: schedule.weekday.to_string(),
            start_time: format_time(schedule.start_time),
            end_time: format_time(schedule.end_time),
            location_name: schedule.location.name.clone(),
            location_address: schedule.location.address.clone(),
            capacity: schedule.capacity,
            casual_capacity: schedule.casual_capacity,
        }
    }
}

/// A game session as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: i64,
    pub schedule_id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location_name: String,
    pub location_address: String,
    pub capacity: u16,
    pub casual_capacity: u16,
}

impl From<&GameSession> for SessionInfo {
    fn from(session: &GameSession) -> Self {
        Self {
            session_id: session.id.value(),
            schedule_id: session.schedule.value(),
            date: session.date.to_string(),
            start_time: format_time(session.start_time),
            end_time: format_time(session.end_time),
            location_name: session.location.name.clone(),
            location_address: session.location.address.clone(),
            capacity: session.capacity,
            casual_capacity: session.casual_capacity,
        }
    }
}

/// A booking as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInfo {
    pub booking_id: i64,
    pub session_id: i64,
    pub user_id: String,
    pub player_level: String,
    pub created_at: String,
}

impl From<&Booking> for BookingInfo {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id.value(),
            session_id: booking.session.value(),
            user_id: booking.user_id.clone(),
            player_level: booking.player_level.as_str().to_string(),
            created_at: booking.created_at.clone(),
        }
    }
}

/// API response for a committed cascade delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeDeleteResponse {
    pub root: EntityRef,
    pub semesters: usize,
    pub schedules: usize,
    pub sessions: usize,
    pub bookings: usize,
    pub message: String,
}

impl From<CascadeSummary> for CascadeDeleteResponse {
    fn from(summary: CascadeSummary) -> Self {
        Self {
            root: summary.root,
            semesters: summary.semesters,
            schedules: summary.schedules,
            sessions: summary.sessions,
            bookings: summary.bookings,
            message: format!(
                "Deleted {} and {} dependent records",
                summary.root,
                summary.total().saturating_sub(1)
            ),
        }
    }
}

/// What deleting a semester would remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionPlanResponse {
    pub root: EntityRef,
    pub schedules: usize,
    pub sessions: usize,
    pub bookings: usize,
    pub total: usize,
}

impl From<&DeletionPlan> for DeletionPlanResponse {
    fn from(plan: &DeletionPlan) -> Self {
        Self {
            root: plan.root(),
            schedules: plan.count(EntityKind::Schedule),
            sessions: plan.count(EntityKind::GameSession),
            bookings: plan.count(EntityKind::Booking),
            total: plan.len(),
        }
    }
}

fn format_time(value: Time) -> String {
    format!("{:02}:{:02}", value.hour(), value.minute())
}
