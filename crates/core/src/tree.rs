// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Arena of tracked jobs.
//!
//! Jobs are never removed, so a [`JobId`] handed out by [`JobTree::insert`]
//! stays valid for the lifetime of the tree and ids sort in creation order.

use crate::error::JobError;
use crate::job::{Job, JobConfig, JobId};
use crate::search::SearchId;
use crate::state::JobState;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Default)]
pub struct JobTree {
    jobs: Vec<Job>,
}

impl JobTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a job and link it under its parent
    pub fn insert(&mut self, search: SearchId, config: JobConfig) -> JobId {
        let id = JobId::new(self.jobs.len());
        let parent = config.parent;
        self.jobs.push(Job::new(id, search, config));
        if let Some(parent) = parent.and_then(|p| self.jobs.get_mut(p.index())) {
            parent.children.push(id);
        }
        id
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(id.index())
    }

    pub fn get_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.jobs.get_mut(id.index())
    }

    /// The submitted job
    pub fn root(&self) -> Option<&Job> {
        self.jobs.first()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    /// Job following execution `number` of `identifier`
    pub fn find(&self, identifier: &str, number: u64) -> Option<JobId> {
        self.jobs
            .iter()
            .find(|job| job.identifier == identifier && job.execution_number == Some(number))
            .map(|job| job.id)
    }

    pub fn find_child(&self, parent: JobId, identifier: &str) -> Option<JobId> {
        self.get(parent)?
            .children
            .iter()
            .copied()
            .find(|child| self[*child].identifier == identifier)
    }

    /// "A #10 (Streaming)" for log and error messages
    pub fn describe(&self, id: JobId) -> String {
        match self.get(id) {
            Some(job) => format!("{} ({})", job.display_name(), job.state),
            None => id.to_string(),
        }
    }

    /// Move a job to `to`. Staying put is a no-op that returns `Ok(false)`.
    pub fn change_state(&mut self, id: JobId, to: JobState) -> Result<bool, JobError> {
        let from = self[id].state;
        if from == to {
            return Ok(false);
        }
        if !from.can_transition_to(to) {
            return Err(JobError::InvalidTransition { job: self.describe(id), from, to });
        }
        self[id].state = to;
        Ok(true)
    }

    /// Mark a job and every descendant as never running.
    ///
    /// Descendants that were already joined keep that state.
    pub fn cut(&mut self, id: JobId) -> Result<(), JobError> {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if !self[next].state.wont_run() {
                self.change_state(next, JobState::Cut)?;
            }
            pending.extend(self[next].children.iter().copied());
        }
        Ok(())
    }

    /// Record that `id` is represented by `target` and cut its descendants.
    pub fn set_joined(&mut self, id: JobId, target: JobId) -> Result<(), JobError> {
        let target_state = self[target].state;
        if target_state.wont_run() {
            return Err(JobError::InvalidJoin { job: self.describe(target), state: target_state });
        }
        self.change_state(id, JobState::Joined)?;
        self[id].joined = Some(target);
        let children = self[id].children.clone();
        for child in children {
            self.cut(child)?;
        }
        Ok(())
    }

    /// Follow join links to the job that actually represents the execution
    pub fn working_job(&self, id: JobId) -> JobId {
        let mut current = id;
        for _ in 0..self.jobs.len() {
            match self.get(current).and_then(|job| job.joined) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Any finished job whose result counts as a failure
    pub fn has_failed_jobs(&self, fail_on_unstable: bool) -> bool {
        self.jobs.iter().any(|job| {
            job.state == JobState::Done
                && job.task_result(fail_on_unstable) == crate::TaskResult::Failed
        })
    }

    /// Any job still needing work
    pub fn has_active_jobs(&self) -> bool {
        self.jobs.iter().any(|job| job.state.is_active())
    }
}

impl Index<JobId> for JobTree {
    type Output = Job;

    fn index(&self, id: JobId) -> &Job {
        &self.jobs[id.index()]
    }
}

impl IndexMut<JobId> for JobTree {
    fn index_mut(&mut self, id: JobId) -> &mut Job {
        &mut self.jobs[id.index()]
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
