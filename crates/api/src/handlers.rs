// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Every handler authorizes the actor first, then validates input, then
//! touches the store. Handlers are independent of the HTTP framework.

use court_booking_cascade::{CascadeExecutor, CascadeSummary, DeletionPlan};
use court_booking_domain::{
    Booking, BookingId, BookingWindow, GameSession, GameSessionId, GameSessionSchedule, Location,
    NewBooking, NewGameSession, NewSchedule, NewSemester, PlayerLevel, ScheduleId, Semester,
    SemesterId,
};
use court_booking_persistence::{Persistence, PersistenceError};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Time, Weekday};
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_cascade_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    BookingInfo, CascadeDeleteResponse, CreateBookingRequest, CreateScheduleRequest,
    CreateSemesterRequest, CreateSessionRequest, DeletionPlanResponse, ListSemestersResponse,
    ScheduleInfo, SemesterInfo, SessionInfo,
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

fn parse_date(field: &str, value: &str) -> Result<Date, ApiError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|e| ApiError::InvalidInput {
        field: String::from(field),
        message: format!("Failed to parse date '{value}': {e}"),
    })
}

fn parse_time(field: &str, value: &str) -> Result<Time, ApiError> {
    Time::parse(value.trim(), TIME_FORMAT).map_err(|e| ApiError::InvalidInput {
        field: String::from(field),
        message: format!("Failed to parse time '{value}': {e}"),
    })
}

fn parse_weekday(field: &str, value: &str) -> Result<Weekday, ApiError> {
    match value.trim().to_lowercase().as_str() {
        "monday" => Ok(Weekday::Monday),
        "tuesday" => Ok(Weekday::Tuesday),
        "wednesday" => Ok(Weekday::Wednesday),
        "thursday" => Ok(Weekday::Thursday),
        "friday" => Ok(Weekday::Friday),
        "saturday" => Ok(Weekday::Saturday),
        "sunday" => Ok(Weekday::Sunday),
        _ => Err(ApiError::InvalidInput {
            field: String::from(field),
            message: format!("'{value}' is not a weekday"),
        }),
    }
}

fn load_semester(persistence: &mut Persistence, id: SemesterId) -> Result<Semester, ApiError> {
    persistence
        .get::<Semester>(id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::not_found(id.into()))
}

fn load_schedule(
    persistence: &mut Persistence,
    id: ScheduleId,
) -> Result<GameSessionSchedule, ApiError> {
    persistence
        .get::<GameSessionSchedule>(id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::not_found(id.into()))
}

fn load_session(persistence: &mut Persistence, id: GameSessionId) -> Result<GameSession, ApiError> {
    persistence
        .get::<GameSession>(id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::not_found(id.into()))
}

/// Creates a semester.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - A date, time or weekday cannot be parsed
/// - The name is blank or the date range is inverted
pub fn create_semester(
    persistence: &mut Persistence,
    request: &CreateSemesterRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<SemesterInfo, ApiError> {
    AuthorizationService::authorize_structure_change(authenticated_actor, "create_semester")?;

    let booking_window = BookingWindow {
        weekday: parse_weekday("booking_weekday", &request.booking_weekday)?,
        time: parse_time("booking_time", &request.booking_time)?,
    };
    let new = NewSemester::new(
        &request.name,
        parse_date("start_date", &request.start_date)?,
        parse_date("end_date", &request.end_date)?,
        booking_window,
    )
    .map_err(translate_domain_error)?;

    let semester: Semester = persistence
        .create::<Semester>(&new)
        .map_err(translate_persistence_error)?;
    info!(semester = %semester.id, actor = %authenticated_actor.id, "Semester created");
    Ok(SemesterInfo::from(&semester))
}

/// Lists every semester, ordered by id.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_semesters(persistence: &mut Persistence) -> Result<ListSemestersResponse, ApiError> {
    let semesters: Vec<Semester> = persistence
        .find_by_parent::<Semester>(())
        .map_err(translate_persistence_error)?;
    Ok(ListSemestersResponse {
        semesters: semesters.iter().map(SemesterInfo::from).collect(),
    })
}

/// Loads one semester.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the semester does not exist.
pub fn get_semester(
    persistence: &mut Persistence,
    semester_id: SemesterId,
) -> Result<SemesterInfo, ApiError> {
    load_semester(persistence, semester_id).map(|semester| SemesterInfo::from(&semester))
}

/// Adds a recurring weekly schedule to a semester.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The semester does not exist
/// - The times, location or capacities are invalid
pub fn create_schedule(
    persistence: &mut Persistence,
    semester_id: SemesterId,
    request: &CreateScheduleRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ScheduleInfo, ApiError> {
    AuthorizationService::authorize_structure_change(authenticated_actor, "create_schedule")?;
    load_semester(persistence, semester_id)?;

    let new = NewSchedule::new(
        semester_id,
        parse_weekday("weekday", &request.weekday)?,
        parse_time("start_time", &request.start_time)?,
        parse_time("end_time", &request.end_time)?,
        Location::new(&request.location_name, &request.location_address),
        request.capacity,
        request.casual_capacity,
    )
    .map_err(translate_domain_error)?;

    let schedule: GameSessionSchedule = persistence
        .create::<GameSessionSchedule>(&new)
        .map_err(translate_persistence_error)?;
    info!(
        schedule = %schedule.id,
        semester = %semester_id,
        actor = %authenticated_actor.id,
        "Schedule created"
    );
    Ok(ScheduleInfo::from(&schedule))
}

/// Generates the game session of a schedule on one date.
///
/// The session copies its times, location and capacities from the
/// schedule.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The schedule does not exist
/// - The date is not on the schedule's weekday or lies outside the semester
pub fn create_session(
    persistence: &mut Persistence,
    schedule_id: ScheduleId,
    request: &CreateSessionRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<SessionInfo, ApiError> {
    AuthorizationService::authorize_structure_change(authenticated_actor, "create_session")?;
    let schedule: GameSessionSchedule = load_schedule(persistence, schedule_id)?;
    let semester: Semester = load_semester(persistence, schedule.semester)?;

    let date: Date = parse_date("date", &request.date)?;
    if !semester.contains(date) {
        return Err(ApiError::InvalidInput {
            field: String::from("date"),
            message: format!(
                "{date} is outside {} ({} to {})",
                semester.name, semester.start_date, semester.end_date
            ),
        });
    }
    let new = NewGameSession::from_schedule(&schedule, date).map_err(translate_domain_error)?;

    let session: GameSession = persistence
        .create::<GameSession>(&new)
        .map_err(translate_persistence_error)?;
    info!(
        session = %session.id,
        schedule = %schedule_id,
        actor = %authenticated_actor.id,
        "Game session created"
    );
    Ok(SessionInfo::from(&session))
}

/// Books a place on a game session. Any authenticated actor may book.
///
/// # Errors
///
/// Returns an error if the session does not exist, the user reference is
/// blank or the player level is unknown.
pub fn create_booking(
    persistence: &mut Persistence,
    session_id: GameSessionId,
    request: &CreateBookingRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BookingInfo, ApiError> {
    load_session(persistence, session_id)?;

    let player_level: PlayerLevel = request
        .player_level
        .parse()
        .map_err(translate_domain_error)?;
    let new = NewBooking::new(session_id, &request.user_id, player_level)
        .map_err(translate_domain_error)?;

    let booking: Booking = persistence
        .create::<Booking>(&new)
        .map_err(translate_persistence_error)?;
    info!(
        booking = %booking.id,
        session = %session_id,
        actor = %authenticated_actor.id,
        "Booking created"
    );
    Ok(BookingInfo::from(&booking))
}

/// Cancels one booking. Any authenticated actor may cancel.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the booking does not exist.
pub fn delete_booking(
    persistence: &mut Persistence,
    booking_id: BookingId,
    authenticated_actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    persistence
        .delete::<Booking>(booking_id)
        .map_err(|e| match e {
            PersistenceError::NotFound(_) => ApiError::not_found(booking_id.into()),
            other => translate_persistence_error(other),
        })?;
    info!(booking = %booking_id, actor = %authenticated_actor.id, "Booking deleted");
    Ok(())
}

/// Deletes a semester together with its schedules, game sessions and
/// bookings, atomically.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The semester does not exist
/// - The cascade fails, in which case nothing was deleted
pub fn delete_semester(
    persistence: &mut Persistence,
    executor: &CascadeExecutor,
    semester_id: SemesterId,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CascadeDeleteResponse, ApiError> {
    AuthorizationService::authorize_structure_change(authenticated_actor, "delete_semester")?;
    let summary: CascadeSummary = executor
        .delete_semester_cascade(persistence.connection(), semester_id)
        .map_err(translate_cascade_error)?;
    log_cascade(&summary, authenticated_actor);
    Ok(CascadeDeleteResponse::from(summary))
}

/// Deletes a schedule together with its game sessions and bookings,
/// atomically.
///
/// # Errors
///
/// Same as [`delete_semester`].
pub fn delete_schedule(
    persistence: &mut Persistence,
    executor: &CascadeExecutor,
    schedule_id: ScheduleId,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CascadeDeleteResponse, ApiError> {
    AuthorizationService::authorize_structure_change(authenticated_actor, "delete_schedule")?;
    let summary: CascadeSummary = executor
        .delete_schedule_cascade(persistence.connection(), schedule_id)
        .map_err(translate_cascade_error)?;
    log_cascade(&summary, authenticated_actor);
    Ok(CascadeDeleteResponse::from(summary))
}

/// Deletes a game session together with its bookings, atomically.
///
/// # Errors
///
/// Same as [`delete_semester`].
pub fn delete_session(
    persistence: &mut Persistence,
    executor: &CascadeExecutor,
    session_id: GameSessionId,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CascadeDeleteResponse, ApiError> {
    AuthorizationService::authorize_structure_change(authenticated_actor, "delete_session")?;
    let summary: CascadeSummary = executor
        .delete_session_cascade(persistence.connection(), session_id)
        .map_err(translate_cascade_error)?;
    log_cascade(&summary, authenticated_actor);
    Ok(CascadeDeleteResponse::from(summary))
}

/// Reports what deleting a semester would remove, without deleting.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the semester does not
/// exist.
pub fn preview_semester_deletion(
    persistence: &mut Persistence,
    executor: &CascadeExecutor,
    semester_id: SemesterId,
    authenticated_actor: &AuthenticatedActor,
) -> Result<DeletionPlanResponse, ApiError> {
    AuthorizationService::authorize_structure_change(
        authenticated_actor,
        "preview_semester_deletion",
    )?;
    let plan: DeletionPlan = executor
        .preview_semester_cascade(persistence.connection(), semester_id)
        .map_err(translate_cascade_error)?;
    Ok(DeletionPlanResponse::from(&plan))
}

fn log_cascade(summary: &CascadeSummary, authenticated_actor: &AuthenticatedActor) {
    info!(
        root = %summary.root,
        schedules = summary.schedules,
        sessions = summary.sessions,
        bookings = summary.bookings,
        actor = %authenticated_actor.id,
        "Cascade delete completed"
    );
}
