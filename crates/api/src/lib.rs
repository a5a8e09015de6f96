// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the court booking system.
//!
//! Handlers take already-authenticated actors and typed ids, enforce
//! authorization, validate input and translate every lower-layer error into
//! an [`ApiError`]. Transport concerns (HTTP status codes, JSON bodies,
//! header parsing) belong to the server.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_stub};
pub use error::{
    ApiError, AuthError, translate_cascade_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    create_booking, create_schedule, create_semester, create_session, delete_booking,
    delete_schedule, delete_semester, delete_session, get_semester, list_semesters,
    preview_semester_deletion,
};
pub use request_response::{
    BookingInfo, CascadeDeleteResponse, CreateBookingRequest, CreateScheduleRequest,
    CreateSemesterRequest, CreateSessionRequest, DeletionPlanResponse, ListSemestersResponse,
    ScheduleInfo, SemesterInfo, SessionInfo,
};
