// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use court_booking_api::{
    ApiError, AuthError, AuthenticatedActor, BookingInfo, CreateBookingRequest,
    CreateScheduleRequest, CreateSemesterRequest, CreateSessionRequest, DeletionPlanResponse,
    ListSemestersResponse, Role, ScheduleInfo, SemesterInfo, SessionInfo, authenticate_stub,
    create_booking, create_schedule, create_semester, create_session, delete_booking,
    delete_schedule, delete_semester, delete_session, get_semester, list_semesters,
    preview_semester_deletion,
};
use court_booking_cascade::CascadeExecutor;
use court_booking_domain::{BookingId, EntityKind, GameSessionId, ScheduleId, SemesterId};
use court_booking_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Header carrying the authenticated actor id.
const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Header carrying the authenticated actor role.
const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Court Booking Server - HTTP server for club court bookings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Maximum time a cascading delete may take, in milliseconds. Unbounded
    /// when not set.
    #[arg(long)]
    cascade_budget_ms: Option<u64>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer. Cascades hold the lock for their whole run.
    persistence: Arc<Mutex<Persistence>>,
    /// Executes cascading deletes.
    cascade: Arc<CascadeExecutor>,
}

impl AppState {
    fn new(persistence: Persistence, cascade: CascadeExecutor) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            cascade: Arc::new(cascade),
        }
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Request failed with an internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Result<&'h str, HttpError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            HttpError::from(ApiError::AuthenticationFailed {
                reason: format!("Missing header '{name}'"),
            })
        })
}

/// Authenticates the caller from the actor headers.
fn authenticate(headers: &HeaderMap) -> Result<AuthenticatedActor, HttpError> {
    let role: Role = header_value(headers, ACTOR_ROLE_HEADER)?
        .parse()
        .map_err(|e: AuthError| HttpError::from(ApiError::from(e)))?;
    authenticate_stub(header_value(headers, ACTOR_ID_HEADER)?, role)
        .map_err(|e| HttpError::from(ApiError::from(e)))
}

/// Parses a path id. An id that cannot name any row is reported as not
/// found.
fn parse_id(kind: EntityKind, raw: &str) -> Result<i64, HttpError> {
    raw.parse::<i64>().map_err(|_| HttpError {
        status: StatusCode::NOT_FOUND,
        message: format!("{kind} '{raw}' not found"),
    })
}

/// Handler for POST `/semesters`.
async fn handle_create_semester(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateSemesterRequest>,
) -> Result<(StatusCode, Json<SemesterInfo>), HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    info!(actor_id = %actor.id, name = %req.name, "Handling create_semester request");

    let mut persistence = app_state.persistence.lock().await;
    let info: SemesterInfo = create_semester(&mut persistence, &req, &actor)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(info)))
}

/// Handler for GET `/semesters`.
async fn handle_list_semesters(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListSemestersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListSemestersResponse = list_semesters(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/semesters/{id}`.
async fn handle_get_semester(
    AxumState(app_state): AxumState<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SemesterInfo>, HttpError> {
    let id = SemesterId::new(parse_id(EntityKind::Semester, &raw_id)?);

    let mut persistence = app_state.persistence.lock().await;
    let info: SemesterInfo = get_semester(&mut persistence, id)?;
    drop(persistence);

    Ok(Json(info))
}

/// Handler for DELETE `/semesters/{id}`.
///
/// Deletes the semester and everything below it as one unit.
async fn handle_delete_semester(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    let id = SemesterId::new(parse_id(EntityKind::Semester, &raw_id)?);
    info!(actor_id = %actor.id, semester = %id, "Handling delete_semester request");

    let mut persistence = app_state.persistence.lock().await;
    let response = delete_semester(&mut persistence, &app_state.cascade, id, &actor)?;
    drop(persistence);

    info!(message = %response.message, "Semester deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/semesters/{id}/deletion_plan`.
async fn handle_preview_semester_deletion(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<Json<DeletionPlanResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    let id = SemesterId::new(parse_id(EntityKind::Semester, &raw_id)?);

    let mut persistence = app_state.persistence.lock().await;
    let response: DeletionPlanResponse =
        preview_semester_deletion(&mut persistence, &app_state.cascade, id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/semesters/{id}/schedules`.
async fn handle_create_schedule(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleInfo>), HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    let semester_id = SemesterId::new(parse_id(EntityKind::Semester, &raw_id)?);
    info!(actor_id = %actor.id, semester = %semester_id, "Handling create_schedule request");

    let mut persistence = app_state.persistence.lock().await;
    let info: ScheduleInfo = create_schedule(&mut persistence, semester_id, &req, &actor)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(info)))
}

/// Handler for DELETE `/schedules/{id}`.
async fn handle_delete_schedule(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    let id = ScheduleId::new(parse_id(EntityKind::Schedule, &raw_id)?);
    info!(actor_id = %actor.id, schedule = %id, "Handling delete_schedule request");

    let mut persistence = app_state.persistence.lock().await;
    let response = delete_schedule(&mut persistence, &app_state.cascade, id, &actor)?;
    drop(persistence);

    info!(message = %response.message, "Schedule deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/schedules/{id}/sessions`.
async fn handle_create_session(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionInfo>), HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    let schedule_id = ScheduleId::new(parse_id(EntityKind::Schedule, &raw_id)?);
    info!(
        actor_id = %actor.id,
        schedule = %schedule_id,
        date = %req.date,
        "Handling create_session request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let info: SessionInfo = create_session(&mut persistence, schedule_id, &req, &actor)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(info)))
}

/// Handler for DELETE `/sessions/{id}`.
async fn handle_delete_session(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    let id = GameSessionId::new(parse_id(EntityKind::GameSession, &raw_id)?);
    info!(actor_id = %actor.id, session = %id, "Handling delete_session request");

    let mut persistence = app_state.persistence.lock().await;
    let response = delete_session(&mut persistence, &app_state.cascade, id, &actor)?;
    drop(persistence);

    info!(message = %response.message, "Game session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/sessions/{id}/bookings`.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingInfo>), HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    let session_id = GameSessionId::new(parse_id(EntityKind::GameSession, &raw_id)?);
    info!(actor_id = %actor.id, session = %session_id, "Handling create_booking request");

    let mut persistence = app_state.persistence.lock().await;
    let info: BookingInfo = create_booking(&mut persistence, session_id, &req, &actor)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(info)))
}

/// Handler for DELETE `/bookings/{id}`.
async fn handle_delete_booking(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, HttpError> {
    let actor: AuthenticatedActor = authenticate(&headers)?;
    let id = BookingId::new(parse_id(EntityKind::Booking, &raw_id)?);

    let mut persistence = app_state.persistence.lock().await;
    delete_booking(&mut persistence, id, &actor)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/semesters",
            post(handle_create_semester).get(handle_list_semesters),
        )
        .route(
            "/semesters/{id}",
            get(handle_get_semester).delete(handle_delete_semester),
        )
        .route(
            "/semesters/{id}/deletion_plan",
            get(handle_preview_semester_deletion),
        )
        .route("/semesters/{id}/schedules", post(handle_create_schedule))
        .route("/schedules/{id}", delete(handle_delete_schedule))
        .route("/schedules/{id}/sessions", post(handle_create_session))
        .route("/sessions/{id}", delete(handle_delete_session))
        .route("/sessions/{id}/bookings", post(handle_create_booking))
        .route("/bookings/{id}", delete(handle_delete_booking))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Court Booking Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let mut cascade: CascadeExecutor = CascadeExecutor::default();
    if let Some(budget_ms) = args.cascade_budget_ms {
        info!(budget_ms, "Cascade deletes are time-bounded");
        cascade = cascade.with_budget(Duration::from_millis(budget_ms));
    }

    let app: Router = build_router(AppState::new(persistence, cascade));

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
