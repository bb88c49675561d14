// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completions of effects, applied on the queue task

use crate::http::{HttpError, Response};
use crate::job::JobId;
use crate::search::SearchId;
use std::path::PathBuf;

/// What happened to a results download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Connection was reset; try again after the poll interval
    Retry,
    /// The job published no results
    NoResults,
    Extracted { archive: PathBuf, entries: usize },
    /// Anything else; reported as a warning and never fails the job
    Warning(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    DefinitionFetched { job: JobId, url: String, outcome: Result<Response, HttpError> },
    BuildFetched { search: SearchId, number: u64, url: String, outcome: Result<Response, HttpError> },
    ConsoleFetched { job: JobId, url: String, outcome: Result<Response, HttpError> },
    ResultFetched { job: JobId, url: String, outcome: Result<Response, HttpError> },
    ResultsDownloaded { job: JobId, url: String, outcome: DownloadOutcome },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::DefinitionFetched { .. } => "definition_fetched",
            Event::BuildFetched { .. } => "build_fetched",
            Event::ConsoleFetched { .. } => "console_fetched",
            Event::ResultFetched { .. } => "result_fetched",
            Event::ResultsDownloaded { .. } => "results_downloaded",
        }
    }

    /// One-line summary for logs
    pub fn log_summary(&self) -> String {
        let status = |outcome: &Result<Response, HttpError>| match outcome {
            Ok(response) => response.status.to_string(),
            Err(e) => e.to_string(),
        };
        match self {
            Event::DefinitionFetched { job, outcome, .. }
            | Event::ConsoleFetched { job, outcome, .. }
            | Event::ResultFetched { job, outcome, .. } => {
                format!("{} job={job} status={}", self.name(), status(outcome))
            }
            Event::BuildFetched { search, number, outcome, .. } => {
                format!("{} search={search} number={number} status={}", self.name(), status(outcome))
            }
            Event::ResultsDownloaded { job, outcome, .. } => {
                format!("{} job={job} outcome={outcome:?}", self.name())
            }
        }
    }
}
