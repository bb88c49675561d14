// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job queue: owns the job tree and drives every job to completion.
//!
//! All state lives on the task running [`JobQueue::run`]. Handlers never
//! block on I/O; they emit an [`Effect`] that is executed on a spawned task
//! and whose [`Event`] comes back over a channel. An owner's [`WorkSlot`]
//! stays claimed until its event is applied, so each job and each search has
//! at most one Jenkins call in flight.
//!
//! [`WorkSlot`]: jkq_core::WorkSlot

mod console;
mod jobs;
mod resolve;
mod search;

use crate::error::RuntimeError;
use crate::executor::Executor;
use crate::submit::RootExecution;
use crate::summary;
use jkq_adapters::{JenkinsClient, Reporter};
use jkq_core::{
    job_identifier, Clock, Effect, Event, JobConfig, JobId, JobSearch, JobState, JobTree,
    SearchId, TaskOptions, TaskResult,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// External dependencies of the queue
pub struct QueueDeps<J, R> {
    pub client: J,
    pub reporter: R,
}

/// How tracking ended when no error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every job reached a terminal state and none failed
    Complete,
    /// A finished job has a failing result
    Failed,
}

/// Final outcome handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueReport {
    pub result: TaskResult,
    pub message: String,
    pub summary: Option<PathBuf>,
}

pub struct JobQueue<J: JenkinsClient, R: Reporter, C: Clock> {
    options: TaskOptions,
    tree: JobTree,
    searches: Vec<JobSearch>,
    search_index: HashMap<String, SearchId>,
    executor: Executor<J>,
    reporter: R,
    clock: C,
    tick_interval: Duration,
    event_tx: mpsc::Sender<Event>,
    event_rx: mpsc::Receiver<Event>,
    shutdown: CancellationToken,
}

impl<J: JenkinsClient, R: Reporter, C: Clock> JobQueue<J, R, C> {
    /// Create a queue tracking `root`, the execution the submission produced
    pub fn new(deps: QueueDeps<J, R>, options: TaskOptions, clock: C, root: RootExecution) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut queue = Self {
            options,
            tree: JobTree::new(),
            searches: Vec::new(),
            search_index: HashMap::new(),
            executor: Executor::new(deps.client),
            reporter: deps.reporter,
            clock,
            tick_interval: DEFAULT_TICK_INTERVAL,
            event_tx,
            event_rx,
            shutdown: CancellationToken::new(),
        };
        let identifier = job_identifier(&queue.options.server_endpoint_url, &root.task_url);
        queue.add_job(
            JobConfig::builder(root.name, root.task_url, identifier)
                .execution(root.number, root.url)
                .build(),
        );
        queue
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn tree(&self) -> &JobTree {
        &self.tree
    }

    pub fn options(&self) -> &TaskOptions {
        &self.options
    }

    /// Track a job, sharing the search of any job with the same identifier
    pub fn add_job(&mut self, config: JobConfig) -> JobId {
        let search = match self.search_index.get(&config.identifier) {
            Some(id) => *id,
            None => {
                let id = SearchId::new(self.searches.len());
                self.searches.push(JobSearch::new(id, &config.identifier, &config.task_url));
                self.search_index.insert(config.identifier.clone(), id);
                id
            }
        };
        let id = self.tree.insert(search, config);
        tracing::info!(job = %id, name = %self.tree[id].name, %search, "tracking job");
        id
    }

    /// Drive the queue until every job is finished, a job fails, a fatal
    /// error occurs or `cancel` fires. Reports the outcome before returning.
    pub async fn run(&mut self, cancel: CancellationToken) -> QueueReport {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let outcome = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break Err(RuntimeError::Cancelled),
                _ = ticker.tick() => match self.tick() {
                    Ok(Some(completion)) => break Ok(completion),
                    Ok(None) => {}
                    Err(e) => break Err(e),
                },
                Some(event) = self.event_rx.recv() => {
                    if let Err(e) = self.handle_event(event) {
                        break Err(e);
                    }
                }
            }
        };
        self.stop(outcome).await
    }

    /// One scheduling pass.
    ///
    /// Starts searches for located-but-unresolved jobs whose parent is done,
    /// gives every job with pending work a chance to run, then decides
    /// whether the queue is finished.
    pub fn tick(&mut self) -> Result<Option<Completion>, RuntimeError> {
        for search in self.pending_searches() {
            self.search_do_work(search)?;
        }

        let ready: Vec<JobId> = self
            .tree
            .iter()
            .filter(|job| {
                matches!(
                    job.state,
                    JobState::New | JobState::Streaming | JobState::Finishing | JobState::Downloading
                )
            })
            .map(|job| job.id)
            .collect();
        for job in ready {
            self.job_do_work(job)?;
        }

        if self.tree.has_failed_jobs(self.options.fail_on_unstable_result) {
            return Ok(Some(Completion::Failed));
        }
        if !self.tree.has_active_jobs() {
            return Ok(Some(Completion::Complete));
        }
        self.flush_job_consoles();
        Ok(None)
    }

    /// Apply a completed effect
    pub fn handle_event(&mut self, event: Event) -> Result<(), RuntimeError> {
        tracing::debug!(event = %event.log_summary(), "handling event");
        match event {
            Event::DefinitionFetched { job, url, outcome } => {
                self.on_definition_fetched(job, &url, outcome)
            }
            Event::BuildFetched { search, number, url, outcome } => {
                self.on_build_fetched(search, number, &url, outcome)
            }
            Event::ConsoleFetched { job, url, outcome } => {
                self.on_console_fetched(job, &url, outcome)
            }
            Event::ResultFetched { job, url, outcome } => self.on_result_fetched(job, &url, outcome),
            Event::ResultsDownloaded { job, url, outcome } => {
                self.on_results_downloaded(job, &url, outcome)
            }
        }
    }

    /// Execute an effect off the queue task; its event arrives on the channel
    fn dispatch(&self, effect: Effect) {
        let executor = self.executor.clone();
        let event_tx = self.event_tx.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                event = executor.execute(effect) => {
                    if event_tx.send(event).await.is_err() {
                        tracing::debug!("queue stopped before event was delivered");
                    }
                }
            }
        });
    }

    fn search(&self, id: SearchId) -> &JobSearch {
        &self.searches[id.index()]
    }

    fn search_mut(&mut self, id: SearchId) -> &mut JobSearch {
        &mut self.searches[id.index()]
    }

    /// Change state and log it. Returns whether the state actually changed.
    fn change_state(&mut self, job: JobId, to: JobState) -> Result<bool, RuntimeError> {
        let from = self.tree[job].state;
        let changed = self.tree.change_state(job, to)?;
        if changed {
            tracing::info!(job = %job, name = %self.tree[job].name, %from, %to, "state changed");
        }
        Ok(changed)
    }

    async fn stop(&mut self, outcome: Result<Completion, RuntimeError>) -> QueueReport {
        self.shutdown.cancel();
        self.flush_job_consoles();

        let summary = match summary::write(&self.tree, &self.options.summary_dir).await {
            Ok(path) => {
                self.reporter.attach_summary(summary::SUMMARY_NAME, &path);
                Some(path)
            }
            Err(e) => {
                self.reporter.console(&format!("Error creating link to Jenkins job: {e}"));
                None
            }
        };

        let (result, message) = match outcome {
            Ok(Completion::Complete) => (TaskResult::Succeeded, self.success_message()),
            Ok(Completion::Failed) => (TaskResult::Failed, self.failure_message()),
            Err(e) => {
                tracing::error!(error = %e, "job queue stopped");
                (TaskResult::Failed, e.to_string())
            }
        };
        tracing::info!(%result, %message, "job queue finished");
        self.reporter.complete(result, &message);
        QueueReport { result, message, summary }
    }

    fn success_message(&self) -> String {
        if self.options.capture_pipeline {
            "Jenkins pipeline complete"
        } else if self.options.capture_console {
            "Jenkins job complete"
        } else {
            "Jenkins job queued"
        }
        .to_string()
    }

    fn failure_message(&self) -> String {
        if self.options.capture_pipeline {
            "Jenkins pipeline failed"
        } else if self.options.capture_console {
            "Jenkins job failed"
        } else {
            "Jenkins job failed to queue"
        }
        .to_string()
    }
}

#[cfg(test)]
#[path = "../queue_tests/mod.rs"]
mod tests;
