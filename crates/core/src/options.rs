// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task inputs shared by submission and tracking

use crate::urls::{add_url_segment, convert_job_name};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_RESULTS_DIR: &str = "jenkinsResults";

/// A `name=value` job parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobParameter {
    pub name: String,
    pub value: String,
}

/// Everything the queue needs to know about the task it was started for.
#[derive(Clone)]
pub struct TaskOptions {
    /// Jenkins root, e.g. `https://ci.example.com/jenkins`
    pub server_endpoint_url: String,
    pub username: String,
    pub password: String,
    /// Folder-qualified job name, e.g. `team/build`
    pub job_name: String,
    /// Stream console output of tracked jobs
    pub capture_console: bool,
    /// Follow downstream jobs
    pub capture_pipeline: bool,
    pub parameterized_job: bool,
    pub job_parameters: Vec<JobParameter>,
    pub poll_interval: Duration,
    /// Reject invalid TLS certificates
    pub strict_ssl: bool,
    pub save_results_to: PathBuf,
    /// Directory the markdown summary is written to
    pub summary_dir: PathBuf,
    pub fail_on_unstable_result: bool,
    /// Learned during submission; enables the results download
    pub team_build_plugin_available: bool,
}

impl TaskOptions {
    pub fn new(server_endpoint_url: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            server_endpoint_url: server_endpoint_url.into(),
            username: String::new(),
            password: String::new(),
            job_name: job_name.into(),
            capture_console: true,
            capture_pipeline: true,
            parameterized_job: false,
            job_parameters: Vec::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            strict_ssl: true,
            save_results_to: PathBuf::from(DEFAULT_RESULTS_DIR),
            summary_dir: std::env::temp_dir(),
            fail_on_unstable_result: false,
            team_build_plugin_available: false,
        }
    }

    crate::setters! {
        into {
            username: String,
            password: String,
            save_results_to: PathBuf,
            summary_dir: PathBuf,
        }
        set {
            capture_console: bool,
            capture_pipeline: bool,
            parameterized_job: bool,
            job_parameters: Vec<JobParameter>,
            poll_interval: Duration,
            strict_ssl: bool,
            fail_on_unstable_result: bool,
            team_build_plugin_available: bool,
        }
    }

    pub fn job_url(&self) -> String {
        add_url_segment(&self.server_endpoint_url, &convert_job_name(&self.job_name))
    }

    /// Native Jenkins endpoint that queues the job
    pub fn job_queue_url(&self) -> String {
        let endpoint = if self.parameterized_job { "buildWithParameters" } else { "build" };
        add_url_segment(&self.job_url(), &format!("{endpoint}?delay=0"))
    }

    /// Team Build plugin endpoint that queues the job
    pub fn team_job_queue_url(&self) -> String {
        add_url_segment(&self.job_url(), "team-build/build")
    }

    pub fn team_plugin_url(&self) -> String {
        add_url_segment(&self.server_endpoint_url, "pluginManager/available")
    }

    pub fn crumb_url(&self) -> String {
        add_url_segment(
            &self.server_endpoint_url,
            "crumbIssuer/api/xml?xpath=concat(//crumbRequestField,%22:%22,//crumb)",
        )
    }
}

impl fmt::Debug for TaskOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskOptions")
            .field("server_endpoint_url", &self.server_endpoint_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("job_name", &self.job_name)
            .field("capture_console", &self.capture_console)
            .field("capture_pipeline", &self.capture_pipeline)
            .field("parameterized_job", &self.parameterized_job)
            .field("job_parameters", &self.job_parameters)
            .field("poll_interval", &self.poll_interval)
            .field("strict_ssl", &self.strict_ssl)
            .field("save_results_to", &self.save_results_to)
            .field("fail_on_unstable_result", &self.fail_on_unstable_result)
            .field("team_build_plugin_available", &self.team_build_plugin_available)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
