// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locating which execution of a downstream job belongs to which parent.
//!
//! One search exists per job identifier. Every tracked job with that
//! identifier shares it, because a single execution may have been triggered
//! by several upstream executions at once.

use crate::api::{Cause, JobDefinition};
use crate::error::JobError;
use crate::job::JobId;
use crate::tree::JobTree;
use crate::work::WorkSlot;
use std::collections::BTreeMap;

crate::define_index! {
    /// Position of a search in the queue's search arena.
    pub struct SearchId("search-");
}

/// Which way the search walks through build numbers.
///
/// It starts at the last build and walks backward until a build older than
/// the root execution, then forward from the first build after the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Backward,
    Forward,
}

/// Assignment of the jobs triggered by one execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainJob {
    /// The job that follows the execution
    pub main: Option<JobId>,
    /// Jobs that must be joined to `main`
    pub secondary: Vec<JobId>,
}

#[derive(Debug, Clone)]
pub struct JobSearch {
    pub id: SearchId,
    pub identifier: String,
    pub task_url: String,
    definition: Option<JobDefinition>,
    initial_build: u64,
    next_build: u64,
    direction: SearchDirection,
    found_causes: BTreeMap<u64, Vec<Cause>>,
    searching_for: Vec<JobId>,
    pub work: WorkSlot,
}

impl JobSearch {
    pub fn new(id: SearchId, identifier: impl Into<String>, task_url: impl Into<String>) -> Self {
        Self {
            id,
            identifier: identifier.into(),
            task_url: task_url.into(),
            definition: None,
            initial_build: 0,
            next_build: 0,
            direction: SearchDirection::Backward,
            found_causes: BTreeMap::new(),
            searching_for: Vec::new(),
            work: WorkSlot::default(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.definition.is_some()
    }

    pub fn definition(&self) -> Option<&JobDefinition> {
        self.definition.as_ref()
    }

    /// Seed the cursor from the job definition. Later calls are ignored.
    pub fn initialize(&mut self, definition: JobDefinition) {
        if self.definition.is_some() {
            return;
        }
        self.initial_build = definition.last_build_number();
        self.next_build = self.initial_build;
        self.direction = SearchDirection::Backward;
        self.definition = Some(definition);
    }

    pub fn next_build(&self) -> u64 {
        self.next_build
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    pub fn search_for(&mut self, job: JobId) {
        if !self.searching_for.contains(&job) {
            self.searching_for.push(job);
        }
    }

    pub fn searching_for(&self) -> &[JobId] {
        &self.searching_for
    }

    pub fn clear_searching_for(&mut self) {
        self.searching_for.clear();
    }

    pub fn record_causes(&mut self, number: u64, causes: Vec<Cause>) {
        self.found_causes.insert(number, causes);
    }

    pub fn causes(&self, number: u64) -> Option<&[Cause]> {
        self.found_causes.get(&number).map(Vec::as_slice)
    }

    /// Build numbers with recorded causes, ascending
    pub fn known_builds(&self) -> Vec<u64> {
        self.found_causes.keys().copied().collect()
    }

    /// Move the cursor after a build was inspected.
    ///
    /// `build_started` is the inspected build's timestamp and `root_started`
    /// the root execution's; a build older than the root cannot belong to it.
    pub fn advance(&mut self, build_started: Option<u64>, root_started: Option<u64>) {
        match self.direction {
            SearchDirection::Backward => {
                let older_than_root =
                    matches!((build_started, root_started), (Some(b), Some(r)) if b < r);
                if self.next_build <= 1 || older_than_root {
                    self.direction = SearchDirection::Forward;
                    self.next_build = self.initial_build + 1;
                } else {
                    self.next_build -= 1;
                }
            }
            SearchDirection::Forward => self.next_build += 1,
        }
    }

    /// Decide which tracked job follows execution `number` of this search.
    ///
    /// Causes are split by the state of the upstream job they name. A child
    /// of an upstream job that has run is the main job if it already started.
    /// Otherwise the first such child that may still run is picked. Once a
    /// main exists, the other candidates and the children of upstream jobs
    /// that will never run become secondary.
    pub fn determine_main_job(&self, tree: &JobTree, number: u64) -> Result<MainJob, JobError> {
        let causes = self.causes(number).ok_or_else(|| JobError::UnknownExecution {
            identifier: self.identifier.clone(),
            number,
        })?;

        let mut upstream_jobs: Vec<JobId> = Vec::new();
        for (identifier, build) in causes.iter().filter_map(Cause::upstream) {
            if let Some(job) = tree.find(&identifier, build) {
                if !upstream_jobs.contains(&job) {
                    upstream_jobs.push(job);
                }
            }
        }

        let mut main: Option<JobId> = None;
        let mut candidates = Vec::new();
        let mut secondary_only = Vec::new();
        for upstream in upstream_jobs {
            let Some(child) = tree.find_child(upstream, &self.identifier) else {
                continue;
            };
            let upstream_state = tree[upstream].state;
            let child_state = tree[child].state;
            if upstream_state.has_run() {
                if child_state.has_run() {
                    if let Some(first) = main {
                        return Err(JobError::MultipleMains {
                            identifier: self.identifier.clone(),
                            number,
                            first: tree.describe(first),
                            second: tree.describe(child),
                        });
                    }
                    main = Some(child);
                } else if child_state.may_run() {
                    candidates.push(child);
                }
            } else if upstream_state.wont_run() {
                secondary_only.push(child);
            }
        }

        if main.is_none() && !candidates.is_empty() {
            main = Some(candidates.remove(0));
        }
        if main.is_none() {
            return Ok(MainJob::default());
        }

        candidates.extend(secondary_only);
        Ok(MainJob { main, secondary: candidates })
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
