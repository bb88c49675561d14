// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jkq-engine: submits the Jenkins job and tracks it, and the jobs it
//! triggers, to completion

mod error;
mod executor;
pub mod queue;
pub mod submit;
pub mod summary;

pub use error::RuntimeError;
pub use executor::{Executor, RESULTS_ARCHIVE};
pub use queue::{Completion, JobQueue, QueueDeps, QueueReport, DEFAULT_TICK_INTERVAL};
pub use submit::{parse_job_parameters, poll_root_job, submit_job, RootExecution};
