// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field validation shared by the `New*` constructors.

use time::{Date, Time};

use crate::error::DomainError;
use crate::types::Location;

/// Validates that a display name is not blank.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is empty after trimming.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name must not be empty",
        )));
    }
    Ok(())
}

/// Validates that `start` is on or before `end`.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` if the range is inverted.
pub fn validate_date_range(start: Date, end: Date) -> Result<(), DomainError> {
    if start > end {
        return Err(DomainError::InvalidDateRange { start, end });
    }
    Ok(())
}

/// Validates that `start` is strictly before `end`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimeRange` if the range is empty or inverted.
pub fn validate_time_range(start: Time, end: Time) -> Result<(), DomainError> {
    if start >= end {
        return Err(DomainError::InvalidTimeRange { start, end });
    }
    Ok(())
}

/// Validates that casual spots fit inside the total capacity.
///
/// # Errors
///
/// Returns `DomainError::InvalidCapacity` if `casual_capacity > capacity`.
pub const fn validate_capacities(capacity: u16, casual_capacity: u16) -> Result<(), DomainError> {
    if casual_capacity > capacity {
        return Err(DomainError::InvalidCapacity {
            capacity,
            casual_capacity,
        });
    }
    Ok(())
}

/// Validates that both location fields are filled in.
///
/// # Errors
///
/// Returns `DomainError::InvalidLocation` naming the empty field.
pub fn validate_location(location: &Location) -> Result<(), DomainError> {
    if location.name.trim().is_empty() {
        return Err(DomainError::InvalidLocation(String::from(
            "Location name must not be empty",
        )));
    }
    if location.address.trim().is_empty() {
        return Err(DomainError::InvalidLocation(String::from(
            "Location address must not be empty",
        )));
    }
    Ok(())
}

/// Validates an opaque user reference.
///
/// # Errors
///
/// Returns `DomainError::InvalidUserReference` if the reference is blank.
pub fn validate_user_reference(user_id: &str) -> Result<(), DomainError> {
    if user_id.trim().is_empty() {
        return Err(DomainError::InvalidUserReference(String::from(
            "User id must not be empty",
        )));
    }
    Ok(())
}
