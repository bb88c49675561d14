// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queueing the root job and waiting for Jenkins to start it

use crate::error::{retry_on_reset, RuntimeError};
use jkq_adapters::{JenkinsClient, Reporter};
use jkq_core::{add_url_segment, JobParameter, QueueItem, TaskOptions, TeamBuildCreated};
use serde_json::json;

/// Build variables forwarded to the Team Build plugin when they are set
pub const TEAM_BUILD_VARIABLES: &[&str] = &[
    "Build.Clean",
    "Build.SyncSources",
    "System.Debug",
    "Agent.BuildDirectory",
    "Agent.HomeDirectory",
    "Agent.Id",
    "Agent.MachineName",
    "Agent.Name",
    "Agent.WorkFolder",
    "Build.ArtifactStagingDirectory",
    "Build.BuildId",
    "Build.BuildNumber",
    "Build.BuildUri",
    "Build.BinariesDirectory",
    "Build.DefinitionName",
    "Build.DefinitionVersion",
    "Build.QueuedBy",
    "Build.QueuedById",
    "Build.Repository.Clean",
    "Build.Repository.LocalPath",
    "Build.Repository.Name",
    "Build.Repository.Provider",
    "Build.Repository.Tfvc.Workspace",
    "Build.Repository.Uri",
    "Build.RequestedFor",
    "Build.RequestedForId",
    "Build.SourceBranch",
    "Build.SourceBranchName",
    "Build.SourcesDirectory",
    "Build.SourceVersion",
    "Build.StagingDirectory",
    "Build.Repository.Git.SubmoduleCheckout",
    "Build.SourceTfvcShelveset",
    "Common.TestResultsDirectory",
    "System.CollectionId",
    "System.DefaultWorkingDirectory",
    "System.DefinitionId",
    "System.TeamFoundationCollectionUri",
    "System.TeamProject",
    "System.TeamProjectId",
    "TF_BUILD",
];

/// The execution Jenkins started for the submitted job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootExecution {
    pub name: String,
    pub task_url: String,
    pub number: u64,
    pub url: String,
}

/// Parse `name=value` lines. Names and values are trimmed.
pub fn parse_job_parameters<S: AsRef<str>>(lines: &[S]) -> Result<Vec<JobParameter>, RuntimeError> {
    lines
        .iter()
        .map(|line| {
            let raw = line.as_ref();
            match raw.trim().split_once('=') {
                Some((name, value)) if !name.trim().is_empty() => Ok(JobParameter {
                    name: name.trim().to_string(),
                    value: value.trim().to_string(),
                }),
                _ => Err(RuntimeError::InvalidParameter(raw.to_string())),
            }
        })
        .collect()
}

/// Set build variables, read from the environment the agent exports them to
pub fn team_build_variables() -> serde_json::Map<String, serde_json::Value> {
    TEAM_BUILD_VARIABLES
        .iter()
        .filter_map(|name| {
            let value = std::env::var(name.to_uppercase().replace('.', "_")).ok()?;
            (!value.is_empty()).then(|| (name.to_string(), serde_json::Value::String(value)))
        })
        .collect()
}

enum Crumb {
    /// The server does not issue crumbs
    Disabled,
    Header(String, String),
}

impl Crumb {
    fn headers(&self) -> Vec<(String, String)> {
        match self {
            Crumb::Disabled => Vec::new(),
            Crumb::Header(name, value) => vec![(name.clone(), value.clone())],
        }
    }
}

/// Queue the configured job and return the URL of its queue item.
///
/// The Team Build plugin endpoint is tried first; a 404 there falls back
/// to the native endpoint and records that the plugin is missing.
pub async fn submit_job<J: JenkinsClient, R: Reporter>(
    client: &J,
    reporter: &R,
    options: &mut TaskOptions,
) -> Result<String, RuntimeError> {
    loop {
        let Some(crumb) = fetch_crumb(client, options).await? else {
            tokio::time::sleep(options.poll_interval).await;
            continue;
        };
        if let Some(queue_url) = try_submit(client, reporter, options, &crumb).await? {
            tracing::info!(%queue_url, plugin = options.team_build_plugin_available, "job queued");
            return Ok(queue_url);
        }
        tokio::time::sleep(options.poll_interval).await;
    }
}

async fn fetch_crumb<J: JenkinsClient>(
    client: &J,
    options: &TaskOptions,
) -> Result<Option<Crumb>, RuntimeError> {
    let url = options.crumb_url();
    let Some(response) = retry_on_reset(client.get(&url).await)? else {
        return Ok(None);
    };
    match response.status {
        404 => {
            tracing::debug!("crumb endpoint not found");
            Ok(Some(Crumb::Disabled))
        }
        200 => {
            let body = response.text().into_owned();
            let (name, value) = body.split_once(':').unwrap_or((body.as_str(), ""));
            Ok(Some(Crumb::Header(name.trim().to_string(), value.trim().to_string())))
        }
        _ => Err(RuntimeError::unexpected("Crumb request failed.", &url, &response)),
    }
}

async fn try_submit<J: JenkinsClient, R: Reporter>(
    client: &J,
    reporter: &R,
    options: &mut TaskOptions,
    crumb: &Crumb,
) -> Result<Option<String>, RuntimeError> {
    let headers = crumb.headers();
    let team_url = options.team_job_queue_url();
    let payload = json!({
        "team-build": team_build_variables(),
        "parameter": options.job_parameters,
    });
    let form = vec![("json".to_string(), payload.to_string())];
    let Some(response) = retry_on_reset(client.post_form(&team_url, &form, &headers).await)? else {
        return Ok(None);
    };

    match response.status {
        201 => {
            options.team_build_plugin_available = true;
            let created: TeamBuildCreated =
                response.json().map_err(|e| RuntimeError::parse(&team_url, e))?;
            Ok(Some(add_url_segment(&created.created, "api/json")))
        }
        404 => {
            reporter.console(&format!(
                "Install the \"Team Foundation Server Plug-in\" for improved Jenkins integration\n{}",
                options.team_plugin_url()
            ));
            options.team_build_plugin_available = false;
            submit_native(client, options, &headers).await
        }
        _ => Err(RuntimeError::unexpected("Job creation failed.", &team_url, &response)),
    }
}

async fn submit_native<J: JenkinsClient>(
    client: &J,
    options: &TaskOptions,
    headers: &[(String, String)],
) -> Result<Option<String>, RuntimeError> {
    let url = options.job_queue_url();
    let form: Vec<(String, String)> = if options.parameterized_job {
        options.job_parameters.iter().map(|p| (p.name.clone(), p.value.clone())).collect()
    } else {
        Vec::new()
    };
    let Some(response) = retry_on_reset(client.post_form(&url, &form, headers).await)? else {
        return Ok(None);
    };
    if response.status != 201 {
        return Err(RuntimeError::unexpected("Job creation failed.", &url, &response));
    }
    let location = response
        .header("location")
        .ok_or_else(|| RuntimeError::MissingHeader { url: url.clone(), header: "location" })?;
    Ok(Some(add_url_segment(location, "api/json")))
}

/// Poll the queue item until Jenkins assigns an execution
pub async fn poll_root_job<J: JenkinsClient>(
    client: &J,
    options: &TaskOptions,
    queue_url: &str,
) -> Result<RootExecution, RuntimeError> {
    loop {
        if let Some(response) = retry_on_reset(client.get(queue_url).await)? {
            if response.status != 200 {
                return Err(RuntimeError::unexpected(
                    "Job progress tracking failed to read job queue.",
                    queue_url,
                    &response,
                ));
            }
            let item: QueueItem =
                response.json().map_err(|e| RuntimeError::parse(queue_url, e))?;
            if item.is_cancelled() {
                return Err(RuntimeError::JobCanceled);
            }
            if let (Some(task), Some(executable)) = (item.task, item.executable) {
                tracing::info!(name = %task.name, number = executable.number, "root job started");
                return Ok(RootExecution {
                    name: task.name,
                    task_url: task.url,
                    number: executable.number,
                    url: executable.url,
                });
            }
            tracing::debug!(%queue_url, "job not started yet");
        }
        tokio::time::sleep(options.poll_interval).await;
    }
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
