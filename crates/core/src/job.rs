// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A tracked Jenkins job and its console buffer

use crate::api::Build;
use crate::result::{ResultCode, TaskResult};
use crate::search::SearchId;
use crate::state::JobState;
use crate::urls::add_url_segment;
use crate::work::WorkSlot;

crate::define_index! {
    /// Position of a job in its [`JobTree`](crate::tree::JobTree).
    pub struct JobId("job-");
}

const DIVIDER_WIDTH: usize = 78;

/// Console text of one job, held back until the job is allowed to print.
#[derive(Debug, Clone, Default)]
pub struct Console {
    buffer: String,
    offset: u64,
    enabled: bool,
}

impl Console {
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Move the progressive-text offset forward. Offsets never move back.
    pub fn advance_to(&mut self, offset: u64) {
        self.offset = self.offset.max(offset);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append text. Returns true when the caller should also print it now.
    pub fn log(&mut self, text: &str) -> bool {
        self.buffer.push_str(text);
        self.enabled
    }

    /// Allow printing. Returns the held-back text on the first call only.
    pub fn enable(&mut self) -> Option<String> {
        if self.enabled {
            return None;
        }
        self.enabled = true;
        (!self.buffer.is_empty()).then(|| self.buffer.clone())
    }
}

/// Configuration for creating a job
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub name: String,
    pub task_url: String,
    pub identifier: String,
    pub parent: Option<JobId>,
    /// Known execution, only for the root job
    pub execution: Option<(u64, String)>,
}

impl JobConfig {
    pub fn builder(
        name: impl Into<String>,
        task_url: impl Into<String>,
        identifier: impl Into<String>,
    ) -> JobConfigBuilder {
        JobConfigBuilder {
            name: name.into(),
            task_url: task_url.into(),
            identifier: identifier.into(),
            parent: None,
            execution: None,
        }
    }
}

pub struct JobConfigBuilder {
    name: String,
    task_url: String,
    identifier: String,
    parent: Option<JobId>,
    execution: Option<(u64, String)>,
}

impl JobConfigBuilder {
    crate::setters! {
        option {
            parent: JobId,
        }
    }

    pub fn execution(mut self, number: u64, url: impl Into<String>) -> Self {
        self.execution = Some((number, url.into()));
        self
    }

    pub fn build(self) -> JobConfig {
        JobConfig {
            name: self.name,
            task_url: self.task_url,
            identifier: self.identifier,
            parent: self.parent,
            execution: self.execution,
        }
    }
}

/// One node of the pipeline tree
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    /// Definition URL, e.g. `http://jenkins/job/A/`
    pub task_url: String,
    /// Normalized path under the server, e.g. `job/A`
    pub identifier: String,
    pub parent: Option<JobId>,
    pub children: Vec<JobId>,
    /// Downstream projects from the definition were added as children
    pub downstream_spawned: bool,
    pub state: JobState,
    /// Search shared by every job with this identifier
    pub search: SearchId,
    pub execution_number: Option<u64>,
    /// Run URL, e.g. `http://jenkins/job/A/10/`
    pub execution_url: Option<String>,
    /// Job representing the same execution once this one is joined
    pub joined: Option<JobId>,
    /// Final build payload once a result is known
    pub result: Option<Build>,
    pub console: Console,
    pub work: WorkSlot,
}

impl Job {
    pub fn new(id: JobId, search: SearchId, config: JobConfig) -> Self {
        let (execution_number, execution_url) = match config.execution {
            Some((number, url)) => (Some(number), Some(url)),
            None => (None, None),
        };
        Self {
            id,
            name: config.name,
            task_url: config.task_url,
            identifier: config.identifier,
            parent: config.parent,
            children: Vec::new(),
            downstream_spawned: false,
            state: JobState::New,
            search,
            execution_number,
            execution_url,
            joined: None,
            result: None,
            console: Console::default(),
            work: WorkSlot::default(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Record the located execution; the URL is derived from the task URL
    /// unless one was already known.
    pub fn set_execution(&mut self, number: u64) {
        if self.execution_number != Some(number) || self.execution_url.is_none() {
            self.execution_url = Some(add_url_segment(&self.task_url, &number.to_string()));
        }
        self.execution_number = Some(number);
    }

    pub fn result_code(&self) -> Option<ResultCode> {
        self.result.as_ref()?.result.as_deref().map(ResultCode::parse)
    }

    /// Host-facing result of this job
    pub fn task_result(&self, fail_on_unstable: bool) -> TaskResult {
        match (self.state, self.result_code()) {
            (JobState::Queued, _) => TaskResult::Succeeded,
            (JobState::Done, Some(ResultCode::Success)) => TaskResult::Succeeded,
            (JobState::Done, Some(ResultCode::Unstable)) if !fail_on_unstable => {
                TaskResult::Succeeded
            }
            _ => TaskResult::Failed,
        }
    }

    /// Short label for summaries
    pub fn result_label(&self) -> String {
        match (self.state, self.result_code()) {
            (JobState::Queued, _) => "Queued".to_string(),
            (JobState::Done, Some(code)) => code.label().to_string(),
            _ => "Unknown".to_string(),
        }
    }

    pub fn display_name(&self) -> String {
        match self.execution_number {
            Some(number) => format!("{} #{number}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Frame a message between two divider lines
pub fn console_block(message: &str) -> String {
    let divider = "*".repeat(DIVIDER_WIDTH);
    format!("{divider}\n{message}\n{divider}\n")
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
