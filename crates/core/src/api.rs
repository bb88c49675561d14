// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jenkins REST payloads.
//!
//! Only the fields the queue reads are modeled; everything else in the
//! responses is ignored.

use crate::urls::normalize_identifier;
use serde::{Deserialize, Serialize};

/// `<task>/api/json` restricted to downstream projects and the last build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDefinition {
    #[serde(default)]
    pub downstream_projects: Vec<Project>,
    #[serde(default)]
    pub last_build: Option<BuildRef>,
}

impl JobDefinition {
    /// Build number the search starts from. A job that never ran starts at 1.
    pub fn last_build_number(&self) -> u64 {
        self.last_build.as_ref().map(|b| b.number).unwrap_or(1)
    }

    pub fn enabled_downstream(&self) -> impl Iterator<Item = &Project> {
        self.downstream_projects.iter().filter(|p| !p.is_disabled())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl Project {
    pub fn is_disabled(&self) -> bool {
        self.color.as_deref() == Some("disabled")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRef {
    pub number: u64,
}

/// `<task>/<n>/api/json` or `<execution>/api/json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Build {
    #[serde(default)]
    pub actions: Vec<Option<Action>>,
    /// Start of the execution in epoch milliseconds
    #[serde(default)]
    pub timestamp: Option<u64>,
    /// Absent or null while the build is still running
    #[serde(default)]
    pub result: Option<String>,
}

impl Build {
    /// Causes of the first action that carries any
    pub fn causes(&self) -> &[Cause] {
        self.actions
            .iter()
            .flatten()
            .find_map(|action| action.causes.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub causes: Option<Vec<Cause>>,
}

/// Why a build was started. Upstream fields are only set for builds
/// triggered by another job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cause {
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub upstream_build: Option<u64>,
    #[serde(default)]
    pub upstream_project: Option<String>,
    #[serde(default)]
    pub upstream_url: Option<String>,
}

impl Cause {
    /// The upstream execution as `(identifier, number)`, if this is an upstream cause
    pub fn upstream(&self) -> Option<(String, u64)> {
        let url = self.upstream_url.as_deref()?;
        let number = self.upstream_build?;
        Some((normalize_identifier(url), number))
    }
}

/// Queue item returned while a submitted job waits for an executor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    #[serde(default)]
    pub cancelled: bool,
    /// Some Jenkins versions spell it this way
    #[serde(default)]
    pub canceled: bool,
    #[serde(default)]
    pub task: Option<QueueTask>,
    #[serde(default)]
    pub executable: Option<Executable>,
}

impl QueueItem {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled || self.canceled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueTask {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Executable {
    pub number: u64,
    pub url: String,
}

/// Response of the team-build plugin when it queued a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamBuildCreated {
    pub created: String,
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
