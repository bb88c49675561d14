// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use jkq_adapters::JenkinsClient;
use jkq_core::{DownloadOutcome, Effect, Event, Response};
use std::path::{Path, PathBuf};

pub const RESULTS_ARCHIVE: &str = "team-results.zip";

/// Performs effects against Jenkins. Never touches queue state.
#[derive(Clone)]
pub struct Executor<J> {
    client: J,
}

impl<J: JenkinsClient> Executor<J> {
    pub fn new(client: J) -> Self {
        Self { client }
    }

    /// Execute a single effect with tracing and return its completion event
    pub async fn execute(&self, effect: Effect) -> Event {
        let info = effect
            .fields()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ");
        let op = effect.name();
        tracing::debug!("executing effect={} {}", op, info);

        let start = std::time::Instant::now();
        let event = self.execute_inner(effect).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(elapsed_ms, "completed {}", event.log_summary());
        event
    }

    async fn execute_inner(&self, effect: Effect) -> Event {
        match effect {
            Effect::FetchDefinition { job, url } => {
                let outcome = self.client.get(&url).await;
                Event::DefinitionFetched { job, url, outcome }
            }
            Effect::FetchBuild { search, number, url } => {
                let outcome = self.client.get(&url).await;
                Event::BuildFetched { search, number, url, outcome }
            }
            Effect::FetchConsole { job, url } => {
                let outcome = self.client.get(&url).await;
                Event::ConsoleFetched { job, url, outcome }
            }
            Effect::FetchResult { job, url } => {
                let outcome = self.client.get(&url).await;
                Event::ResultFetched { job, url, outcome }
            }
            Effect::DownloadResults { job, url, dir } => {
                let outcome = self.download_results(&url, &dir).await;
                Event::ResultsDownloaded { job, url, outcome }
            }
        }
    }

    async fn download_results(&self, url: &str, dir: &Path) -> DownloadOutcome {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            return DownloadOutcome::Warning(format!(
                "Unable to create results directory {}: {e}",
                dir.display()
            ));
        }
        let archive: PathBuf = dir.join(RESULTS_ARCHIVE);
        match self.client.download(url, &archive).await {
            Err(e) if e.is_transient() => DownloadOutcome::Retry,
            Err(e) => DownloadOutcome::Warning(format!(
                "Unable to download results to {}: {e}",
                archive.display()
            )),
            Ok(response) => match response.status {
                200 => match jkq_adapters::extract(&archive, dir).await {
                    Ok(entries) => DownloadOutcome::Extracted { archive, entries },
                    Err(e) => DownloadOutcome::Warning(format!(
                        "Unable to extract results from {}: {e}",
                        archive.display()
                    )),
                },
                404 => DownloadOutcome::NoResults,
                _ => DownloadOutcome::Warning(download_failure(&response)),
            },
        }
    }
}

fn download_failure(response: &Response) -> String {
    if response.status >= 500 {
        format!(
            "A Jenkins error occurred while retrieving results. Results could not be downloaded.\n{}",
            response.text()
        )
    } else {
        format!(
            "Jenkins results could not be downloaded (HTTP {}).\n{}",
            response.status,
            response.text()
        )
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
