// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolving located jobs into streaming, joined or cut ones

use super::JobQueue;
use crate::error::RuntimeError;
use jkq_adapters::{JenkinsClient, Reporter};
use jkq_core::{console_block, Clock, JobError, JobId, JobState};

impl<J: JenkinsClient, R: Reporter, C: Clock> JobQueue<J, R, C> {
    /// Try to settle a job from the causes its search already recorded.
    ///
    /// Returns true once the job is past `New`/`Locating`.
    pub(super) fn resolve_if_known(&mut self, job: JobId) -> Result<bool, RuntimeError> {
        if !self.tree[job].state.may_run() {
            return Ok(true);
        }

        let Some(parent) = self.tree[job].parent else {
            let number = self.tree[job].execution_number.ok_or_else(|| {
                JobError::MissingExecution { job: self.tree.describe(job) }
            })?;
            self.set_streaming(job, number)?;
            return Ok(true);
        };

        if self.tree[parent].state.wont_run() {
            tracing::info!(job = %job, parent = %parent, "parent will not run, cutting job");
            self.tree.cut(job)?;
            return Ok(true);
        }

        let search = self.tree[job].search;
        for number in self.search(search).known_builds() {
            let assignment = self.search(search).determine_main_job(&self.tree, number)?;
            let Some(main) = assignment.main else {
                continue;
            };
            if main == job {
                self.set_streaming(job, number)?;
                return Ok(true);
            }
            if assignment.secondary.contains(&job) {
                self.set_joined(job, main)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Attach a job to execution `number` and start following it
    pub(super) fn set_streaming(&mut self, job: JobId, number: u64) -> Result<(), RuntimeError> {
        let state = self.tree[job].state;
        if state.wont_run() {
            return Err(JobError::CannotStream { job: self.tree.describe(job), state }.into());
        }

        if state.may_run() {
            self.tree[job].set_execution(number);
            self.change_state(job, JobState::Streaming)?;
            self.spawn_downstream(job);
            if self.options.capture_console {
                let url = self.execution_url(job)?.to_string();
                let message = format!("Jenkins job started: {}\n{url}", self.tree[job].name);
                self.console_log(job, &console_block(&message));
                if self.find_active_console_job().is_none() {
                    self.reporter.console(&format!("Jenkins job pending: {url}"));
                }
            } else {
                self.change_state(job, JobState::Finishing)?;
            }
        }

        self.join_others_to_me(job)
    }

    /// Join every other job that turned out to follow the same execution
    fn join_others_to_me(&mut self, job: JobId) -> Result<(), RuntimeError> {
        if self.tree[job].is_root() {
            return Ok(());
        }
        let Some(number) = self.tree[job].execution_number else {
            return Ok(());
        };

        let search = self.tree[job].search;
        let assignment = self.search(search).determine_main_job(&self.tree, number)?;
        if assignment.main != Some(job) {
            return Err(JobError::NotMain {
                job: self.tree.describe(job),
                identifier: self.search(search).identifier.clone(),
                number,
            }
            .into());
        }
        for secondary in assignment.secondary {
            if self.tree[secondary].state != JobState::Cut {
                self.set_joined(secondary, job)?;
            }
        }
        Ok(())
    }

    pub(super) fn set_joined(&mut self, job: JobId, target: JobId) -> Result<(), RuntimeError> {
        self.tree.set_joined(job, target)?;
        tracing::info!(
            job = %job,
            joined = %self.tree.describe(job),
            target = %self.tree.describe(target),
            "joined job"
        );
        Ok(())
    }
}
