// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A required name is empty or whitespace.
    #[error("Invalid name: {0}")]
    InvalidName(String),
    /// A date range ends before it starts.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// The first day of the range.
        start: time::Date,
        /// The last day of the range.
        end: time::Date,
    },
    /// A time range is empty or inverted.
    #[error("Invalid time range: {start} must be before {end}")]
    InvalidTimeRange {
        /// The start of the range.
        start: time::Time,
        /// The end of the range.
        end: time::Time,
    },
    /// Casual capacity is larger than total capacity.
    #[error("Casual capacity {casual_capacity} exceeds capacity {capacity}")]
    InvalidCapacity {
        /// The total capacity.
        capacity: u16,
        /// The casual capacity.
        casual_capacity: u16,
    },
    /// A location field is empty.
    #[error("Invalid location: {0}")]
    InvalidLocation(String),
    /// A booking was made without a user reference.
    #[error("Invalid user reference: {0}")]
    InvalidUserReference(String),
    /// A player level string is not recognised.
    #[error("Invalid player level: {0}")]
    InvalidPlayerLevel(String),
    /// A session date falls on a different weekday than its schedule.
    #[error("Session date {date} is a {actual}, schedule runs on {expected}")]
    WeekdayMismatch {
        /// The session date.
        date: time::Date,
        /// The weekday of the schedule.
        expected: time::Weekday,
        /// The weekday of the session date.
        actual: time::Weekday,
    },
}
