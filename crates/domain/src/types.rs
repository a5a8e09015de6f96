// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::{Date, Time, Weekday};

use crate::entity::{BookingId, Entity, EntityKind, GameSessionId, ScheduleId, SemesterId};
use crate::error::DomainError;
use crate::validation::{
    validate_capacities, validate_date_range, validate_location, validate_name,
    validate_time_range, validate_user_reference,
};

/// Where a game session takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: String,
}

impl Location {
    #[must_use]
    pub fn new(name: &str, address: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            address: address.trim().to_string(),
        }
    }
}

/// When bookings for a week's sessions open.
///
/// Bookings for the coming week open every `weekday` at `time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingWindow {
    pub weekday: Weekday,
    pub time: Time,
}

/// Self-declared skill level attached to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl PlayerLevel {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl std::str::FromStr for PlayerLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(DomainError::InvalidPlayerLevel(s.to_string())),
        }
    }
}

// ============================================================================
// Semester
// ============================================================================

/// The root scheduling period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    pub id: SemesterId,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub booking_window: BookingWindow,
}

/// Validated input for creating a semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSemester {
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub booking_window: BookingWindow,
}

impl NewSemester {
    /// Creates a new semester definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the date range is inverted.
    pub fn new(
        name: &str,
        start_date: Date,
        end_date: Date,
        booking_window: BookingWindow,
    ) -> Result<Self, DomainError> {
        validate_name(name)?;
        validate_date_range(start_date, end_date)?;
        Ok(Self {
            name: name.trim().to_string(),
            start_date,
            end_date,
            booking_window,
        })
    }
}

impl Semester {
    /// Returns whether `date` falls inside this semester.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

impl Entity for Semester {
    type Id = SemesterId;
    type ParentId = ();
    type New = NewSemester;

    const KIND: EntityKind = EntityKind::Semester;

    fn id(&self) -> SemesterId {
        self.id
    }

    fn parent_id(&self) {}
}

// ============================================================================
// GameSessionSchedule
// ============================================================================

/// A recurring weekly session template within a semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSessionSchedule {
    pub id: ScheduleId,
    pub semester: SemesterId,
    pub weekday: Weekday,
    pub start_time: Time,
    pub end_time: Time,
    pub location: Location,
    pub capacity: u16,
    pub casual_capacity: u16,
}

/// Validated input for creating a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSchedule {
    pub semester: SemesterId,
    pub weekday: Weekday,
    pub start_time: Time,
    pub end_time: Time,
    pub location: Location,
    pub capacity: u16,
    pub casual_capacity: u16,
}

impl NewSchedule {
    /// Creates a new schedule definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the time range, location or capacities are invalid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        semester: SemesterId,
        weekday: Weekday,
        start_time: Time,
        end_time: Time,
        location: Location,
        capacity: u16,
        casual_capacity: u16,
    ) -> Result<Self, DomainError> {
        validate_time_range(start_time, end_time)?;
        validate_location(&location)?;
        validate_capacities(capacity, casual_capacity)?;
        Ok(Self {
            semester,
            weekday,
            start_time,
            end_time,
            location,
            capacity,
            casual_capacity,
        })
    }
}

impl Entity for GameSessionSchedule {
    type Id = ScheduleId;
    type ParentId = SemesterId;
    type New = NewSchedule;

    const KIND: EntityKind = EntityKind::Schedule;

    fn id(&self) -> ScheduleId {
        self.id
    }

    fn parent_id(&self) -> SemesterId {
        self.semester
    }
}

// ============================================================================
// GameSession
// ============================================================================

/// One concrete dated occurrence of a schedule.
///
/// Location and capacities are copied from the schedule when the session is
/// generated so that later schedule edits do not rewrite past sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: GameSessionId,
    pub schedule: ScheduleId,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub location: Location,
    pub capacity: u16,
    pub casual_capacity: u16,
}

/// Validated input for creating a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameSession {
    pub schedule: ScheduleId,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub location: Location,
    pub capacity: u16,
    pub casual_capacity: u16,
}

impl NewGameSession {
    /// Creates a new game session definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the time range, location or capacities are invalid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        schedule: ScheduleId,
        date: Date,
        start_time: Time,
        end_time: Time,
        location: Location,
        capacity: u16,
        casual_capacity: u16,
    ) -> Result<Self, DomainError> {
        validate_time_range(start_time, end_time)?;
        validate_location(&location)?;
        validate_capacities(capacity, casual_capacity)?;
        Ok(Self {
            schedule,
            date,
            start_time,
            end_time,
            location,
            capacity,
            casual_capacity,
        })
    }

    /// Generates the occurrence of `schedule` on `date`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::WeekdayMismatch` if `date` is not on the
    /// schedule's weekday.
    pub fn from_schedule(schedule: &GameSessionSchedule, date: Date) -> Result<Self, DomainError> {
        if date.weekday() != schedule.weekday {
            return Err(DomainError::WeekdayMismatch {
                date,
                expected: schedule.weekday,
                actual: date.weekday(),
            });
        }
        Ok(Self {
            schedule: schedule.id,
            date,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            location: schedule.location.clone(),
            capacity: schedule.capacity,
            casual_capacity: schedule.casual_capacity,
        })
    }
}

impl Entity for GameSession {
    type Id = GameSessionId;
    type ParentId = ScheduleId;
    type New = NewGameSession;

    const KIND: EntityKind = EntityKind::GameSession;

    fn id(&self) -> GameSessionId {
        self.id
    }

    fn parent_id(&self) -> ScheduleId {
        self.schedule
    }
}

// ============================================================================
// Booking
// ============================================================================

/// A user's reservation against one game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub session: GameSessionId,
    pub user_id: String,
    pub player_level: PlayerLevel,
    pub created_at: String,
}

/// Validated input for creating a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub session: GameSessionId,
    pub user_id: String,
    pub player_level: PlayerLevel,
}

impl NewBooking {
    /// Creates a new booking definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the user reference is blank.
    pub fn new(
        session: GameSessionId,
        user_id: &str,
        player_level: PlayerLevel,
    ) -> Result<Self, DomainError> {
        validate_user_reference(user_id)?;
        Ok(Self {
            session,
            user_id: user_id.trim().to_string(),
            player_level,
        })
    }
}

impl Entity for Booking {
    type Id = BookingId;
    type ParentId = GameSessionId;
    type New = NewBooking;

    const KIND: EntityKind = EntityKind::Booking;

    fn id(&self) -> BookingId {
        self.id
    }

    fn parent_id(&self) -> GameSessionId {
        self.session
    }
}
