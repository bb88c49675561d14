// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects represent the Jenkins calls the queue needs to perform

use crate::job::JobId;
use crate::search::SearchId;
use std::path::PathBuf;

/// Requests emitted by queue handlers and executed off the queue task.
///
/// Every effect names its owner; the owner's work slot stays claimed until
/// the matching [`Event`](crate::event::Event) has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// `GET <task>/api/json` for downstream projects and the last build
    FetchDefinition { job: JobId, url: String },

    /// `GET <task>/<number>/api/json` for the causes of one build
    FetchBuild { search: SearchId, number: u64, url: String },

    /// `GET <run>/logText/progressiveText/?start=<offset>`
    FetchConsole { job: JobId, url: String },

    /// `GET <run>/api/json` for the build result
    FetchResult { job: JobId, url: String },

    /// `GET <run>/team-results/zip` into `dir`, then extract it there
    DownloadResults { job: JobId, url: String, dir: PathBuf },
}

impl Effect {
    /// Returns the effect name for log spans
    pub fn name(&self) -> &'static str {
        match self {
            Effect::FetchDefinition { .. } => "fetch_definition",
            Effect::FetchBuild { .. } => "fetch_build",
            Effect::FetchConsole { .. } => "fetch_console",
            Effect::FetchResult { .. } => "fetch_result",
            Effect::DownloadResults { .. } => "download_results",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Effect::FetchDefinition { url, .. }
            | Effect::FetchBuild { url, .. }
            | Effect::FetchConsole { url, .. }
            | Effect::FetchResult { url, .. }
            | Effect::DownloadResults { url, .. } => url,
        }
    }

    /// Key-value pairs for structured logging
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::FetchDefinition { job, url }
            | Effect::FetchConsole { job, url }
            | Effect::FetchResult { job, url } => {
                vec![("job", job.to_string()), ("url", url.clone())]
            }
            Effect::FetchBuild { search, number, url } => vec![
                ("search", search.to_string()),
                ("number", number.to_string()),
                ("url", url.clone()),
            ],
            Effect::DownloadResults { job, url, dir } => vec![
                ("job", job.to_string()),
                ("url", url.clone()),
                ("dir", dir.display().to_string()),
            ],
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
