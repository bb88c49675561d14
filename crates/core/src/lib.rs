// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jkq-core: job tree, search state and Jenkins payloads for the Jenkins queue tracker

pub mod macros;

pub mod api;
pub mod clock;
pub mod effect;
pub mod error;
pub mod event;
pub mod http;
pub mod job;
pub mod options;
pub mod result;
pub mod search;
pub mod state;
pub mod tree;
pub mod urls;
pub mod work;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use api::{Build, Cause, JobDefinition, Project, QueueItem, TeamBuildCreated};
pub use clock::{Clock, FakeClock, SystemClock};
pub use effect::Effect;
pub use error::JobError;
pub use event::{DownloadOutcome, Event};
pub use http::{HttpError, Response};
pub use job::{console_block, Console, Job, JobConfig, JobConfigBuilder, JobId};
pub use options::{JobParameter, TaskOptions};
pub use result::{ResultCode, TaskResult};
pub use search::{JobSearch, MainJob, SearchDirection, SearchId};
pub use state::JobState;
pub use tree::JobTree;
pub use urls::{add_url_segment, convert_job_name, job_identifier, normalize_identifier};
pub use work::WorkSlot;
