// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue scenarios against a scripted Jenkins server

mod console;
mod errors;
mod pipeline;

use super::*;
use jkq_adapters::{FakeJenkinsClient, FakeReporter, JenkinsCall};
use jkq_core::test_support;
use jkq_core::{FakeClock, HttpError, Response};
use tempfile::TempDir;

const SERVER: &str = "http://jenkins";
const RUN_TIMEOUT: Duration = Duration::from_secs(60);

type TestQueue = JobQueue<FakeJenkinsClient, FakeReporter, FakeClock>;

fn definition_url(name: &str) -> String {
    format!("{SERVER}/job/{name}/api/json?tree=downstreamProjects[name,url,color],lastBuild[number]")
}

fn build_url(name: &str, number: u64) -> String {
    format!(
        "{SERVER}/job/{name}/{number}/api/json?tree=actions[causes[shortDescription,upstreamBuild,upstreamProject,upstreamUrl]],timestamp"
    )
}

fn console_url(name: &str, number: u64, offset: u64) -> String {
    format!("{SERVER}/job/{name}/{number}/logText/progressiveText/?start={offset}")
}

fn result_url(name: &str, number: u64) -> String {
    format!("{SERVER}/job/{name}/{number}/api/json?tree=result,timestamp")
}

fn results_zip_url(name: &str, number: u64) -> String {
    format!("{SERVER}/job/{name}/{number}/team-results/zip")
}

fn root_execution() -> RootExecution {
    RootExecution {
        name: "A".into(),
        task_url: format!("{SERVER}/job/A/"),
        number: 10,
        url: format!("{SERVER}/job/A/10/"),
    }
}

struct TestContext {
    client: FakeJenkinsClient,
    reporter: FakeReporter,
    clock: FakeClock,
    summary_dir: TempDir,
    results_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            client: FakeJenkinsClient::new(),
            reporter: FakeReporter::new(),
            clock: FakeClock::new(),
            summary_dir: TempDir::new().unwrap(),
            results_dir: TempDir::new().unwrap(),
        }
    }

    /// Console capture on, pipeline capture off, no polling delay
    fn options(&self) -> TaskOptions {
        TaskOptions::new(SERVER, "A")
            .capture_pipeline(false)
            .poll_interval(Duration::ZERO)
            .summary_dir(self.summary_dir.path())
            .save_results_to(self.results_dir.path())
    }

    fn queue(&self, options: TaskOptions) -> TestQueue {
        let deps = QueueDeps { client: self.client.clone(), reporter: self.reporter.clone() };
        JobQueue::new(deps, options, self.clock.clone(), root_execution())
    }

    async fn run(&self, queue: &mut TestQueue) -> QueueReport {
        tokio::time::timeout(RUN_TIMEOUT, queue.run(CancellationToken::new()))
            .await
            .expect("queue did not finish")
    }

    /// Script a job that starts as `number`, prints `console` in one chunk
    /// and finishes with `result`
    fn script_job(&self, name: &str, number: u64, downstream: &[&str], result: &str) {
        self.client
            .respond(&definition_url(name), test_support::definition(downstream, Some(number)))
            .respond(&console_url(name, number, 0), test_support::console(name, None))
            .respond(&result_url(name, number), test_support::result(Some(result), 1000 + number));
    }

    fn requested(&self, fragment: &str) -> bool {
        self.client.calls().iter().any(|call| call.url().contains(fragment))
    }

    fn job_named<'a>(&self, queue: &'a TestQueue, name: &str) -> Vec<&'a jkq_core::Job> {
        queue.tree().iter().filter(|job| job.name == name).collect()
    }
}
