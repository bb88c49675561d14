// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console ownership: at most one job prints live at a time

use super::JobQueue;
use jkq_adapters::{JenkinsClient, Reporter};
use jkq_core::{Clock, JobId, JobState};

impl<J: JenkinsClient, R: Reporter, C: Clock> JobQueue<J, R, C> {
    /// Running job whose console is printing live
    pub(super) fn find_active_console_job(&self) -> Option<JobId> {
        self.tree
            .iter()
            .find(|job| job.state.is_running() && job.console.is_enabled())
            .map(|job| job.id)
    }

    /// Hand the console to waiting jobs when nobody holds it.
    ///
    /// Finished jobs print their buffered output in discovery order. A single
    /// remaining running job then takes the console live; several running
    /// jobs only announce themselves.
    pub(super) fn flush_job_consoles(&mut self) {
        if self.find_active_console_job().is_some() {
            return;
        }

        let finished: Vec<JobId> = self
            .tree
            .iter()
            .filter(|job| job.state == JobState::Done && !job.console.is_enabled())
            .map(|job| job.id)
            .collect();
        let added = !finished.is_empty();
        for job in finished {
            self.enable_console(job);
        }

        let running: Vec<JobId> = self
            .tree
            .iter()
            .filter(|job| matches!(job.state, JobState::Streaming | JobState::Finishing))
            .map(|job| job.id)
            .collect();
        match running.as_slice() {
            [only] => self.enable_console(*only),
            _ if added => {
                for job in running {
                    if let Some(url) = self.tree[job].execution_url.as_deref() {
                        self.reporter.console(&format!("Jenkins job pending: {url}"));
                    }
                }
            }
            _ => {}
        }
    }

    fn enable_console(&mut self, job: JobId) {
        let Some(text) = self.tree[job].console.enable() else {
            return;
        };
        if self.options.capture_console {
            self.reporter.console(text.trim_end_matches('\n'));
        }
    }
}
