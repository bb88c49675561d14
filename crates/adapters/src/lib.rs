// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the outside world: the Jenkins server, the build agent's
//! console and the results archive on disk.

pub mod archive;
pub mod jenkins;
pub mod reporter;

pub use archive::{extract, ArchiveError};
pub use jenkins::{JenkinsClient, ReqwestJenkinsClient};
pub use reporter::{format_command, Reporter, VsoReporter};

#[cfg(any(test, feature = "test-support"))]
pub use jenkins::{FakeJenkinsClient, JenkinsCall};
#[cfg(any(test, feature = "test-support"))]
pub use reporter::{FakeReporter, ReportCall};
