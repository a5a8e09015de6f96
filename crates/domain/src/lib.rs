// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types for the court booking system.
//!
//! This crate knows nothing about storage. It defines the four entities of
//! the scheduling hierarchy, their typed identifiers, and the validation
//! applied before anything is written.

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

mod entity;
mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use entity::{
    BookingId, Entity, EntityKind, EntityRef, GameSessionId, ScheduleId, SemesterId,
};
pub use error::DomainError;
pub use types::{
    Booking, BookingWindow, GameSession, GameSessionSchedule, Location, NewBooking,
    NewGameSession, NewSchedule, NewSemester, PlayerLevel, Semester,
};
pub use validation::{
    validate_capacities, validate_date_range, validate_location, validate_name,
    validate_time_range, validate_user_reference,
};
