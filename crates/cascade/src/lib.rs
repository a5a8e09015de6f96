// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! All-or-nothing cascading deletion of the scheduling hierarchy.
//!
//! Deleting a semester removes its schedules, their game sessions and every
//! booking on those sessions. Deletion happens in two phases:
//!
//! 1. [`CascadeResolver`] walks the hierarchy with plain reads and produces
//!    a [`DeletionPlan`].
//! 2. [`CascadeExecutor`] opens one transaction, deletes the plan bottom-up
//!    (bookings, sessions, schedules, semester) and commits.
//!
//! If any step fails the transaction is rolled back and the caller receives
//! a [`CascadeError`] naming the root and the failing entity. A caller never
//! observes a partially deleted hierarchy.
//!
//! Children created between the two phases are not in the plan. Their parent
//! is protected by an `ON DELETE RESTRICT` foreign key, so its delete fails
//! and the cascade rolls back rather than leaving an orphan.

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
#![allow(clippy::multiple_crate_versions)]

mod deadline;
mod error;
mod executor;
mod plan;
mod resolver;

#[cfg(test)]
mod tests;

pub use error::{CascadeError, StepFailure};
pub use executor::CascadeExecutor;
pub use plan::{CascadeSummary, DeletionPlan};
pub use resolver::CascadeResolver;
