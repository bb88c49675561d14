// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task inputs. The build agent passes them as `JKQ_*` environment variables.

use clap::{ArgAction, Parser};
use jkq_core::options::DEFAULT_RESULTS_DIR;
use jkq_core::TaskOptions;
use jkq_engine::{parse_job_parameters, RuntimeError};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "jkq",
    version,
    about = "Queue a Jenkins job and follow it, and the jobs it triggers, to completion"
)]
pub struct Args {
    /// Jenkins server URL, e.g. https://jenkins.example.com
    #[arg(long, env = "JKQ_SERVER_URL")]
    pub server_url: String,

    #[arg(long, env = "JKQ_USERNAME", default_value = "")]
    pub username: String,

    #[arg(long, env = "JKQ_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Job to queue; folders are separated by '/'
    #[arg(long, env = "JKQ_JOB_NAME")]
    pub job_name: String,

    /// Stream the job's console and wait for its result
    #[arg(long, env = "JKQ_CAPTURE_CONSOLE", default_value_t = true, action = ArgAction::Set)]
    pub capture_console: bool,

    /// Also follow downstream jobs. Requires console capture.
    #[arg(long, env = "JKQ_CAPTURE_PIPELINE", default_value_t = true, action = ArgAction::Set)]
    pub capture_pipeline: bool,

    #[arg(long, env = "JKQ_PARAMETERIZED_JOB", default_value_t = false, action = ArgAction::Set)]
    pub parameterized_job: bool,

    /// `name=value` parameter; repeat the flag or separate lines with newlines
    #[arg(long = "job-parameter", env = "JKQ_JOB_PARAMETERS", value_delimiter = '\n')]
    pub job_parameters: Vec<String>,

    #[arg(long, env = "JKQ_POLL_INTERVAL_MS", default_value_t = 5000)]
    pub poll_interval_ms: u64,

    /// Reject untrusted TLS certificates
    #[arg(long, env = "JKQ_STRICT_SSL", default_value_t = true, action = ArgAction::Set)]
    pub strict_ssl: bool,

    /// Directory results archives are extracted into
    #[arg(long, env = "JKQ_SAVE_RESULTS_TO", default_value = DEFAULT_RESULTS_DIR)]
    pub save_results_to: PathBuf,

    /// Directory for the markdown summary [default: system temp dir]
    #[arg(long, env = "JKQ_SUMMARY_DIR")]
    pub summary_dir: Option<PathBuf>,

    #[arg(long, env = "JKQ_FAIL_ON_UNSTABLE", default_value_t = false, action = ArgAction::Set)]
    pub fail_on_unstable: bool,
}

impl Args {
    pub fn task_options(&self) -> Result<TaskOptions, RuntimeError> {
        let job_parameters = if self.parameterized_job {
            let lines: Vec<&str> = self
                .job_parameters
                .iter()
                .map(String::as_str)
                .filter(|line| !line.trim().is_empty())
                .collect();
            parse_job_parameters(&lines)?
        } else {
            Vec::new()
        };

        let mut options = TaskOptions::new(self.server_url.as_str(), self.job_name.as_str())
            .username(self.username.as_str())
            .password(self.password.as_str())
            .capture_console(self.capture_console)
            .capture_pipeline(self.capture_console && self.capture_pipeline)
            .parameterized_job(self.parameterized_job)
            .job_parameters(job_parameters)
            .poll_interval(Duration::from_millis(self.poll_interval_ms))
            .strict_ssl(self.strict_ssl)
            .save_results_to(self.save_results_to.clone())
            .fail_on_unstable_result(self.fail_on_unstable);
        if let Some(dir) = &self.summary_dir {
            options = options.summary_dir(dir.clone());
        }
        Ok(options)
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
