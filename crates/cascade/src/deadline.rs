// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::{Duration, Instant};

use crate::error::StepFailure;

/// Clock for one cascade call, started when the call begins.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub(crate) fn start(budget: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub(crate) fn unbounded() -> Self {
        Self::start(None)
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn check(&self) -> Result<(), StepFailure> {
        match self.budget {
            Some(budget) if self.started.elapsed() >= budget => {
                Err(StepFailure::DeadlineExceeded { budget })
            }
            _ => Ok(()),
        }
    }
}
