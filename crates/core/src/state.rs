// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle states and the legal transition table

use serde::{Deserialize, Serialize};

/// Lifecycle state of a tracked Jenkins job.
///
/// ```text
/// New ──► Locating ──► Streaming ──► Finishing ──► Downloading ──► Done
///  │         │                           │  │                      ▲
///  │         └─► Joined / Cut            │  └──────────────────────┘
///  └─► Streaming / Joined / Cut          └─► Queued
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Created, definition not yet fetched
    New,
    /// Waiting for the search to find which execution belongs to this job
    Locating,
    /// Console output is being polled
    Streaming,
    /// Console drained, waiting for the build result
    Finishing,
    /// Fetching the team-results archive
    Downloading,
    /// Finished with a known build result
    Done,
    /// Another job represents the same execution
    Joined,
    /// Returned once the job was queued, without following it
    Queued,
    /// Will never run because an ancestor will never run
    Cut,
}

crate::simple_display! {
    JobState {
        New => "New",
        Locating => "Locating",
        Streaming => "Streaming",
        Finishing => "Finishing",
        Downloading => "Downloading",
        Done => "Done",
        Joined => "Joined",
        Queued => "Queued",
        Cut => "Cut",
    }
}

impl JobState {
    pub const ALL: [JobState; 9] = [
        JobState::New,
        JobState::Locating,
        JobState::Streaming,
        JobState::Finishing,
        JobState::Downloading,
        JobState::Done,
        JobState::Joined,
        JobState::Queued,
        JobState::Cut,
    ];

    /// Whether `self -> to` is an edge of the lifecycle graph.
    ///
    /// Staying in the same state is not a transition; callers treat it as a no-op.
    pub fn can_transition_to(self, to: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, to),
            (New, Locating | Streaming | Joined | Cut)
                | (Locating, Streaming | Joined | Cut)
                | (Streaming, Finishing)
                | (Finishing, Downloading | Queued | Done)
                | (Downloading, Done)
        )
    }

    /// No further transitions are possible
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Done | JobState::Joined | JobState::Queued | JobState::Cut)
    }

    /// The queue still has work to do for this job
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// An execution is known and is being followed
    pub fn is_running(self) -> bool {
        matches!(self, JobState::Streaming | JobState::Finishing | JobState::Downloading)
    }

    /// The job's execution has started at some point: running or finished
    pub fn has_run(self) -> bool {
        self.is_running() || matches!(self, JobState::Done | JobState::Queued)
    }

    /// The execution is not known yet but may still turn up
    pub fn may_run(self) -> bool {
        matches!(self, JobState::New | JobState::Locating)
    }

    /// The job will never be followed by the queue
    pub fn wont_run(self) -> bool {
        matches!(self, JobState::Joined | JobState::Cut)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
