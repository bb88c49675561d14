// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job work: one handler per state, and the events they wait on

use super::JobQueue;
use crate::error::{retry_on_reset, RuntimeError};
use jkq_adapters::{JenkinsClient, Reporter};
use jkq_core::{
    add_url_segment, console_block, job_identifier, Build, Clock, DownloadOutcome, Effect,
    HttpError, JobConfig, JobDefinition, JobError, JobId, JobState, Response,
};
use std::time::Duration;

const DEFINITION_QUERY: &str = "api/json?tree=downstreamProjects[name,url,color],lastBuild[number]";
const RESULT_QUERY: &str = "api/json?tree=result,timestamp";

impl<J: JenkinsClient, R: Reporter, C: Clock> JobQueue<J, R, C> {
    pub(super) fn job_do_work(&mut self, job: JobId) -> Result<(), RuntimeError> {
        let now = self.clock.now();
        if !self.tree[job].work.try_begin(now) {
            return Ok(());
        }
        let search = self.tree[job].search;
        match self.tree[job].state {
            JobState::New => self.initialize(job),
            state if state.is_running() && !self.search(search).is_initialized() => {
                self.initialize(job)
            }
            JobState::Streaming => self.stream_console(job),
            JobState::Finishing => self.finish(job),
            JobState::Downloading => self.download_results(job),
            _ => self.finish_job_work(job, Duration::ZERO, None),
        }
    }

    /// Release a job's work slot, optionally moving it to a new state.
    ///
    /// A job that became inactive may unblock buffered consoles.
    pub(super) fn finish_job_work(
        &mut self,
        job: JobId,
        delay: Duration,
        new_state: Option<JobState>,
    ) -> Result<(), RuntimeError> {
        let now = self.clock.now();
        self.tree[job].work.finish(now, delay);
        if let Some(state) = new_state {
            if self.change_state(job, state)? && !state.is_active() {
                self.flush_job_consoles();
            }
        }
        Ok(())
    }

    fn initialize(&mut self, job: JobId) -> Result<(), RuntimeError> {
        let search = self.tree[job].search;
        if self.search(search).is_initialized() {
            return self.on_search_initialized(job);
        }
        let url = add_url_segment(&self.tree[job].task_url, DEFINITION_QUERY);
        self.dispatch(Effect::FetchDefinition { job, url });
        Ok(())
    }

    pub(super) fn on_definition_fetched(
        &mut self,
        job: JobId,
        url: &str,
        outcome: Result<Response, HttpError>,
    ) -> Result<(), RuntimeError> {
        let Some(response) = retry_on_reset(outcome)? else {
            return self.finish_job_work(job, self.options.poll_interval, None);
        };
        if response.status != 200 {
            let context = format!("Unable to retrieve job: {}.", self.tree[job].identifier);
            return Err(RuntimeError::unexpected(context, url, &response));
        }
        let definition: JobDefinition =
            response.json().map_err(|e| RuntimeError::parse(url, e))?;
        let search = self.tree[job].search;
        self.search_mut(search).initialize(definition);
        self.on_search_initialized(job)
    }

    /// Spawn downstream jobs, then try to resolve the job from what the
    /// search already knows. Unresolved jobs wait in `Locating`.
    fn on_search_initialized(&mut self, job: JobId) -> Result<(), RuntimeError> {
        self.spawn_downstream(job);
        self.resolve_if_known(job)?;
        if self.tree[job].state == JobState::New {
            self.finish_job_work(job, self.options.poll_interval, Some(JobState::Locating))
        } else {
            self.finish_job_work(job, Duration::ZERO, None)
        }
    }

    /// Add the enabled downstream projects of the job's definition as
    /// children, once per job and whatever state the job reached meanwhile.
    ///
    /// No-op until the search holds the definition.
    pub(super) fn spawn_downstream(&mut self, job: JobId) {
        if !self.options.capture_pipeline
            || self.tree[job].downstream_spawned
            || self.tree[job].state.wont_run()
        {
            return;
        }
        let search = self.tree[job].search;
        let Some(definition) = self.search(search).definition() else {
            return;
        };
        let downstream: Vec<_> = definition.enabled_downstream().cloned().collect();
        self.tree[job].downstream_spawned = true;
        for project in downstream {
            let identifier = job_identifier(&self.options.server_endpoint_url, &project.url);
            self.add_job(JobConfig::builder(project.name, project.url, identifier).parent(job).build());
        }
    }

    fn stream_console(&mut self, job: JobId) -> Result<(), RuntimeError> {
        let offset = self.tree[job].console.offset();
        let url = add_url_segment(
            self.execution_url(job)?,
            &format!("logText/progressiveText/?start={offset}"),
        );
        self.dispatch(Effect::FetchConsole { job, url });
        Ok(())
    }

    pub(super) fn on_console_fetched(
        &mut self,
        job: JobId,
        url: &str,
        outcome: Result<Response, HttpError>,
    ) -> Result<(), RuntimeError> {
        let poll = self.options.poll_interval;
        let Some(response) = retry_on_reset(outcome)? else {
            return self.finish_job_work(job, poll, None);
        };
        match response.status {
            200 => {
                self.console_log(job, &response.text());
                if response.header("x-more-data") == Some("true") {
                    let size = response
                        .header("x-text-size")
                        .and_then(|size| size.trim().parse::<u64>().ok())
                        .ok_or_else(|| RuntimeError::MissingHeader {
                            url: url.to_string(),
                            header: "x-text-size",
                        })?;
                    self.tree[job].console.advance_to(size);
                    self.finish_job_work(job, poll, None)
                } else {
                    self.finish_job_work(job, Duration::ZERO, Some(JobState::Finishing))
                }
            }
            404 => self.finish_job_work(job, poll, None),
            _ => Err(RuntimeError::unexpected(
                "Job progress tracking failed to read job progress.",
                url,
                &response,
            )),
        }
    }

    fn finish(&mut self, job: JobId) -> Result<(), RuntimeError> {
        if !self.options.capture_console {
            return self.finish_job_work(job, Duration::ZERO, Some(JobState::Queued));
        }
        let url = add_url_segment(self.execution_url(job)?, RESULT_QUERY);
        self.dispatch(Effect::FetchResult { job, url });
        Ok(())
    }

    pub(super) fn on_result_fetched(
        &mut self,
        job: JobId,
        url: &str,
        outcome: Result<Response, HttpError>,
    ) -> Result<(), RuntimeError> {
        let poll = self.options.poll_interval;
        let Some(response) = retry_on_reset(outcome)? else {
            return self.finish_job_work(job, poll, None);
        };
        if response.status != 200 {
            return Err(RuntimeError::unexpected(
                "Job progress tracking failed to read job result.",
                url,
                &response,
            ));
        }
        let build: Build = response.json().map_err(|e| RuntimeError::parse(url, e))?;
        if build.result.is_none() {
            return self.finish_job_work(job, poll, None);
        }

        self.tree[job].result = Some(build);
        let message = format!(
            "Jenkins job finished: {}\n{}",
            self.tree[job].name,
            self.execution_url(job)?
        );
        self.console_log(job, &console_block(&message));
        let next = if self.options.team_build_plugin_available {
            JobState::Downloading
        } else {
            JobState::Done
        };
        self.finish_job_work(job, Duration::ZERO, Some(next))
    }

    fn download_results(&mut self, job: JobId) -> Result<(), RuntimeError> {
        let dir = self.options.save_results_to.join(&self.tree[job].name);
        let url = add_url_segment(self.execution_url(job)?, "team-results/zip");
        self.dispatch(Effect::DownloadResults { job, url, dir });
        Ok(())
    }

    pub(super) fn on_results_downloaded(
        &mut self,
        job: JobId,
        url: &str,
        outcome: DownloadOutcome,
    ) -> Result<(), RuntimeError> {
        match outcome {
            DownloadOutcome::Retry => {
                return self.finish_job_work(job, self.options.poll_interval, None);
            }
            DownloadOutcome::NoResults => {
                tracing::info!(job = %job, %url, "no results published");
            }
            DownloadOutcome::Extracted { archive, entries } => {
                tracing::info!(job = %job, archive = %archive.display(), entries, "results saved");
            }
            DownloadOutcome::Warning(message) => {
                tracing::warn!(job = %job, %url, "results download failed");
                self.reporter.warning(&message);
            }
        }
        self.finish_job_work(job, Duration::ZERO, Some(JobState::Done))
    }

    pub(super) fn execution_url(&self, job: JobId) -> Result<&str, RuntimeError> {
        self.tree[job].execution_url.as_deref().ok_or_else(|| {
            RuntimeError::Job(JobError::MissingExecution { job: self.tree.describe(job) })
        })
    }

    /// Buffer console text, printing it straight away if the job holds the console
    pub(super) fn console_log(&mut self, job: JobId, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.tree[job].console.log(text) {
            self.reporter.console(text.trim_end_matches('\n'));
        }
    }
}
