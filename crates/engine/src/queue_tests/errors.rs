// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transient and fatal Jenkins failures

use super::*;

fn reset() -> HttpError {
    HttpError::ConnectionReset("read ECONNRESET".into())
}

#[tokio::test(start_paused = true)]
async fn connection_reset_while_streaming_is_retried() {
    let ctx = TestContext::new();
    ctx.client
        .respond(&definition_url("A"), test_support::definition(&[], Some(10)))
        .fail(&console_url("A", 10, 0), reset())
        .respond(&console_url("A", 10, 0), test_support::console("A", None))
        .respond(&result_url("A", 10), test_support::result(Some("SUCCESS"), 1000));
    let mut queue = ctx.queue(ctx.options());

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Succeeded);
    assert_eq!(ctx.client.requests_to(&console_url("A", 10, 0)), 2);
}

#[tokio::test(start_paused = true)]
async fn connection_reset_while_initializing_is_retried() {
    let ctx = TestContext::new();
    ctx.client.fail(&definition_url("A"), reset());
    ctx.script_job("A", 10, &[], "SUCCESS");
    let mut queue = ctx.queue(ctx.options());

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Succeeded);
    assert_eq!(ctx.client.requests_to(&definition_url("A")), 2);
}

#[tokio::test(start_paused = true)]
async fn unexpected_console_status_stops_the_queue() {
    let ctx = TestContext::new();
    ctx.client
        .respond(&definition_url("A"), test_support::definition(&[], Some(10)))
        .respond(&console_url("A", 10, 0), Response::new(500).with_body("boom"));
    let mut queue = ctx.queue(ctx.options());

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Failed);
    assert_eq!(
        report.message,
        format!(
            "Job progress tracking failed to read job progress. HTTP 500 from {}: boom",
            console_url("A", 10, 0)
        )
    );
    assert_eq!(ctx.reporter.completion(), Some((TaskResult::Failed, report.message.clone())));
}

#[tokio::test(start_paused = true)]
async fn missing_job_definition_stops_the_queue() {
    let ctx = TestContext::new();
    let mut queue = ctx.queue(ctx.options());

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Failed);
    assert!(report.message.starts_with("Unable to retrieve job: job/A. HTTP 404"));
}

#[tokio::test(start_paused = true)]
async fn transport_error_stops_the_queue() {
    let ctx = TestContext::new();
    ctx.client.fail(&definition_url("A"), HttpError::Transport("certificate rejected".into()));
    let mut queue = ctx.queue(ctx.options());

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Failed);
    assert!(report.message.contains("certificate rejected"));
}

#[tokio::test(start_paused = true)]
async fn malformed_result_stops_the_queue() {
    let ctx = TestContext::new();
    ctx.client
        .respond(&definition_url("A"), test_support::definition(&[], Some(10)))
        .respond(&console_url("A", 10, 0), test_support::console("A", None))
        .respond(&result_url("A", 10), Response::new(200).with_body("<html>"));
    let mut queue = ctx.queue(ctx.options());

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Failed);
    assert!(report.message.starts_with("failed to parse response from"));
}

#[tokio::test(start_paused = true)]
async fn cancellation_reports_failure() {
    let ctx = TestContext::new();
    ctx.script_job("A", 10, &[], "SUCCESS");
    let mut queue = ctx.queue(ctx.options());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = queue.run(cancel).await;

    assert_eq!(report.result, TaskResult::Failed);
    assert_eq!(ctx.reporter.completion().map(|(result, _)| result), Some(TaskResult::Failed));
}
