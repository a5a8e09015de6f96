// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use court_booking_domain::{GameSessionId, ScheduleId, SemesterId};
use court_booking_persistence::Persistence;

use crate::{
    AuthenticatedActor, CreateBookingRequest, CreateScheduleRequest, CreateSemesterRequest,
    CreateSessionRequest, Role, create_booking, create_schedule, create_semester, create_session,
};

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-123"), Role::Admin)
}

pub fn create_test_member() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("member-456"), Role::Member)
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn semester_request(name: &str) -> CreateSemesterRequest {
    CreateSemesterRequest {
        name: String::from(name),
        start_date: String::from("2026-02-23"),
        end_date: String::from("2026-06-14"),
        booking_weekday: String::from("Monday"),
        booking_time: String::from("12:00"),
    }
}

pub fn schedule_request() -> CreateScheduleRequest {
    CreateScheduleRequest {
        weekday: String::from("Wednesday"),
        start_time: String::from("19:00"),
        end_time: String::from("22:00"),
        location_name: String::from("Sports Hall"),
        location_address: String::from("12 Court Road"),
        capacity: 30,
        casual_capacity: 6,
    }
}

pub struct SeededSemester {
    pub semester: SemesterId,
    pub schedule: ScheduleId,
    pub sessions: Vec<GameSessionId>,
}

/// One semester with one Wednesday schedule, two sessions and one booking
/// on the first session.
pub fn seed_semester(persistence: &mut Persistence, name: &str) -> SeededSemester {
    let admin = create_test_admin();
    let semester = create_semester(persistence, &semester_request(name), &admin).unwrap();
    let semester_id = SemesterId::new(semester.semester_id);

    let schedule = create_schedule(persistence, semester_id, &schedule_request(), &admin).unwrap();
    let schedule_id = ScheduleId::new(schedule.schedule_id);

    let mut sessions = Vec::new();
    for date in ["2026-03-04", "2026-03-11"] {
        let session = create_session(
            persistence,
            schedule_id,
            &CreateSessionRequest {
                date: String::from(date),
            },
            &admin,
        )
        .unwrap();
        sessions.push(GameSessionId::new(session.session_id));
    }

    create_booking(
        persistence,
        sessions[0],
        &CreateBookingRequest {
            user_id: String::from("player-1"),
            player_level: String::from("advanced"),
        },
        &create_test_member(),
    )
    .unwrap();

    SeededSemester {
        semester: semester_id,
        schedule: schedule_id,
        sessions,
    }
}
