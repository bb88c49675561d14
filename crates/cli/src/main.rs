// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jkq: queue a Jenkins job from a build agent and report its outcome

mod args;

use args::Args;
use clap::Parser;
use jkq_adapters::{Reporter, ReqwestJenkinsClient, VsoReporter};
use jkq_core::{SystemClock, TaskOptions, TaskResult};
use jkq_engine::{poll_root_job, submit_job, JobQueue, QueueDeps, RootExecution, RuntimeError};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("jkq: {e:#}");
    }
    let args = Args::parse();
    let reporter = VsoReporter::new();

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let result = match run(&args, reporter, cancel).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "task failed before tracking started");
            reporter.complete(TaskResult::Failed, &e.to_string());
            TaskResult::Failed
        }
    };
    match result {
        TaskResult::Succeeded => ExitCode::SUCCESS,
        TaskResult::Failed => ExitCode::FAILURE,
    }
}

/// Logs go to stderr; stdout carries the console stream and agent commands.
fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("JKQ_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("interrupted, stopping");
        cancel.cancel();
    }
}

/// Submit, wait for the root execution, then track the pipeline.
///
/// Errors before tracking starts are returned; the queue reports its own
/// outcome, including failures.
async fn run(
    args: &Args,
    reporter: VsoReporter,
    cancel: CancellationToken,
) -> Result<TaskResult, RuntimeError> {
    let mut options = args.task_options()?;
    tracing::info!(?options, "starting");
    let client = ReqwestJenkinsClient::new(&options)?;

    let root = tokio::select! {
        _ = cancel.cancelled() => return Err(RuntimeError::Cancelled),
        root = start(&client, &reporter, &mut options) => root?,
    };

    let deps = QueueDeps { client, reporter };
    let mut queue = JobQueue::new(deps, options, SystemClock, root);
    Ok(queue.run(cancel).await.result)
}

async fn start(
    client: &ReqwestJenkinsClient,
    reporter: &VsoReporter,
    options: &mut TaskOptions,
) -> Result<RootExecution, RuntimeError> {
    let queue_url = submit_job(client, reporter, options).await?;
    poll_root_job(client, options, &queue_url).await
}
