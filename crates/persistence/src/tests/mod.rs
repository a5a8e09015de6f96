// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]


use court_booking_domain::{
    Booking, BookingWindow, GameSession, GameSessionSchedule, Location, NewBooking,
    NewGameSession, NewSchedule, NewSemester, PlayerLevel, Semester,
};
use time::Weekday;
use time::macros::{date, time};

use crate::Persistence;

pub fn create_test_semester(persistence: &mut Persistence, name: &str) -> Semester {
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

pub fn create_test_schedule(
    persistence: &mut Persistence,
    semester: &Semester,
) -> GameSessionSchedule {
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

pub fn create_test_session(
    persistence: &mut Persistence,
    schedule: &GameSessionSchedule,
    day: u8,
) -> GameSession {
    let date = time::Date::from_calendar_date(2026, time::Month::March, day).expect("Valid date");
    let new = NewGameSession::new(
        schedule.id,
        date,
        schedule.start_time,
        schedule.end_time,
        schedule.location.clone(),
        schedule.capacity,
        schedule.casual_capacity,
    )
    .expect("Valid session");
    persistence
        .create::<GameSession>(&new)
        .expect("Session created")
}

pub fn create_test_booking(
    persistence: &mut Persistence,
    session: &GameSession,
    user_id: &str,
) -> Booking {
    let new = NewBooking::new(session.id, user_id, PlayerLevel::Intermediate).expect("Valid booking");
    persistence.create::<Booking>(&new).expect("Booking created")
}
