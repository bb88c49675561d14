// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Walking build history to locate downstream executions

use super::JobQueue;
use crate::error::{retry_on_reset, RuntimeError};
use jkq_adapters::{JenkinsClient, Reporter};
use jkq_core::{add_url_segment, Build, Clock, Effect, HttpError, JobState, Response, SearchId};
use std::time::Duration;

const BUILD_QUERY: &str =
    "api/json?tree=actions[causes[shortDescription,upstreamBuild,upstreamProject,upstreamUrl]],timestamp";

impl<J: JenkinsClient, R: Reporter, C: Clock> JobQueue<J, R, C> {
    /// Searches that have jobs ready to be located.
    ///
    /// A job only searches once its parent is done, so every upstream cause
    /// it could be matched against is already known. Jobs sharing an
    /// identifier share one search.
    pub(super) fn pending_searches(&mut self) -> Vec<SearchId> {
        let locating: Vec<_> = self
            .tree
            .iter()
            .filter(|job| job.state == JobState::Locating)
            .filter(|job| job.parent.is_none_or(|p| self.tree[p].state == JobState::Done))
            .map(|job| (job.id, job.search))
            .collect();

        let mut pending = Vec::new();
        for (job, search) in locating {
            if self.search(search).work.is_working() {
                continue;
            }
            self.search_mut(search).search_for(job);
            if !pending.contains(&search) {
                pending.push(search);
            }
        }
        pending
    }

    pub(super) fn search_do_work(&mut self, search: SearchId) -> Result<(), RuntimeError> {
        let now = self.clock.now();
        if !self.search_mut(search).work.try_begin(now) {
            return Ok(());
        }

        let mut unresolved = false;
        for job in self.search(search).searching_for().to_vec() {
            if !self.resolve_if_known(job)? {
                unresolved = true;
            }
        }
        if !unresolved {
            self.finish_search_work(search, Duration::ZERO);
            return Ok(());
        }

        let number = self.search(search).next_build();
        let url = add_url_segment(&self.search(search).task_url, &format!("{number}/{BUILD_QUERY}"));
        tracing::debug!(%search, number, direction = ?self.search(search).direction(), "inspecting build");
        self.dispatch(Effect::FetchBuild { search, number, url });
        Ok(())
    }

    pub(super) fn on_build_fetched(
        &mut self,
        search: SearchId,
        number: u64,
        url: &str,
        outcome: Result<Response, HttpError>,
    ) -> Result<(), RuntimeError> {
        let poll = self.options.poll_interval;
        let Some(response) = retry_on_reset(outcome)? else {
            self.finish_search_work(search, poll);
            return Ok(());
        };
        match response.status {
            200 => {}
            // The build has not started yet
            404 => {
                self.finish_search_work(search, poll);
                return Ok(());
            }
            _ => {
                return Err(RuntimeError::unexpected(
                    "Job pipeline tracking failed to read downstream project.",
                    url,
                    &response,
                ))
            }
        }

        let build: Build = response.json().map_err(|e| RuntimeError::parse(url, e))?;
        self.search_mut(search).record_causes(number, build.causes().to_vec());
        let assignment = self.search(search).determine_main_job(&self.tree, number)?;
        if let Some(main) = assignment.main {
            self.set_streaming(main, number)?;
        }

        let root_started = self.tree.root().and_then(|root| root.result.as_ref()?.timestamp);
        self.search_mut(search).advance(build.timestamp, root_started);
        self.finish_search_work(search, Duration::ZERO);
        Ok(())
    }

    fn finish_search_work(&mut self, search: SearchId, delay: Duration) {
        let now = self.clock.now();
        let search = self.search_mut(search);
        search.work.finish(now, delay);
        search.clear_searching_for();
    }
}
