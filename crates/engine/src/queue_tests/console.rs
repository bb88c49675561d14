// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console streaming and completion of a single job

use super::*;

#[tokio::test(start_paused = true)]
async fn streams_console_chunks_in_order() {
    let ctx = TestContext::new();
    ctx.client
        .respond(&definition_url("A"), test_support::definition(&[], Some(10)))
        .respond(&console_url("A", 10, 0), test_support::console("A", Some(1)))
        .respond(&console_url("A", 10, 1), test_support::console("B", Some(2)))
        .respond(&console_url("A", 10, 2), test_support::console("C\n", None))
        .respond(&result_url("A", 10), test_support::result(Some("SUCCESS"), 1000));
    let mut queue = ctx.queue(ctx.options());

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Succeeded);
    assert_eq!(report.message, "Jenkins job complete");
    let root = queue.tree().root().unwrap();
    assert_eq!(root.state, JobState::Done);
    assert!(root.console.buffer().contains("ABC\n"));

    let lines = ctx.reporter.console_lines();
    let streamed: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|line| matches!(*line, "A" | "B" | "C"))
        .collect();
    assert_eq!(streamed, ["A", "B", "C"]);
    assert_eq!(lines[0], "Jenkins job pending: http://jenkins/job/A/10/");
    assert!(lines.iter().any(|l| l.contains("Jenkins job started: A\nhttp://jenkins/job/A/10/")));
    assert!(lines.last().unwrap().contains("Jenkins job finished: A"));
}

#[tokio::test(start_paused = true)]
async fn waits_for_result_to_appear() {
    let ctx = TestContext::new();
    ctx.client
        .respond(&definition_url("A"), test_support::definition(&[], Some(10)))
        .respond(&console_url("A", 10, 0), test_support::console("done", None))
        .respond(&result_url("A", 10), test_support::result(None, 1000))
        .respond(&result_url("A", 10), test_support::result(None, 1000))
        .respond(&result_url("A", 10), test_support::result(Some("SUCCESS"), 1000));
    let mut queue = ctx.queue(ctx.options());

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Succeeded);
    assert_eq!(ctx.client.requests_to(&result_url("A", 10)), 3);
}

#[tokio::test(start_paused = true)]
async fn without_console_capture_job_is_only_queued() {
    let ctx = TestContext::new();
    ctx.client.respond(&definition_url("A"), test_support::definition(&[], Some(10)));
    let mut queue = ctx.queue(ctx.options().capture_console(false));

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Succeeded);
    assert_eq!(report.message, "Jenkins job queued");
    assert_eq!(queue.tree().root().unwrap().state, JobState::Queued);
    assert!(!ctx.requested("progressiveText"));
    assert!(!ctx.requested("tree=result"));
}

#[tokio::test(start_paused = true)]
async fn failing_result_fails_the_task() {
    let ctx = TestContext::new();
    ctx.script_job("A", 10, &[], "FAILURE");
    let mut queue = ctx.queue(ctx.options());

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Failed);
    assert_eq!(report.message, "Jenkins job failed");
    assert_eq!(ctx.reporter.completion(), Some((TaskResult::Failed, report.message.clone())));
}

#[tokio::test(start_paused = true)]
async fn unstable_result_fails_only_when_requested() {
    let ctx = TestContext::new();
    ctx.script_job("A", 10, &[], "UNSTABLE");

    let mut lenient = ctx.queue(ctx.options());
    assert_eq!(ctx.run(&mut lenient).await.result, TaskResult::Succeeded);

    let mut strict = ctx.queue(ctx.options().fail_on_unstable_result(true));
    assert_eq!(ctx.run(&mut strict).await.result, TaskResult::Failed);
}

#[tokio::test(start_paused = true)]
async fn summary_is_attached() {
    let ctx = TestContext::new();
    ctx.script_job("A", 10, &[], "SUCCESS");
    let mut queue = ctx.queue(ctx.options());

    let report = ctx.run(&mut queue).await;

    let path = ctx.summary_dir.path().join("JenkinsJob_A_10.md");
    assert_eq!(report.summary.as_deref(), Some(path.as_path()));
    assert_eq!(ctx.reporter.attachments(), vec![path.clone()]);
    let summary = std::fs::read_to_string(path).unwrap();
    assert!(summary.contains("[A #10](http://jenkins/job/A/10/) <font color='green'>Success</font>"));
}

#[tokio::test(start_paused = true)]
async fn missing_results_archive_still_completes() {
    let ctx = TestContext::new();
    ctx.script_job("A", 10, &[], "SUCCESS");
    let mut queue = ctx.queue(ctx.options().team_build_plugin_available(true));

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Succeeded);
    assert_eq!(ctx.client.requests_to(&results_zip_url("A", 10)), 1);
    assert!(ctx.reporter.warnings().is_empty());
}

#[tokio::test(start_paused = true)]
async fn results_download_error_is_a_warning() {
    let ctx = TestContext::new();
    ctx.script_job("A", 10, &[], "SUCCESS");
    ctx.client.respond(&results_zip_url("A", 10), Response::new(500).with_body("oops"));
    let mut queue = ctx.queue(ctx.options().team_build_plugin_available(true));

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Succeeded);
    let warnings = ctx.reporter.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("A Jenkins error occurred while retrieving results."));
}

#[tokio::test]
async fn job_waits_for_its_poll_interval() {
    let ctx = TestContext::new();
    ctx.client
        .respond(&definition_url("A"), test_support::definition(&[], Some(10)))
        .respond(&console_url("A", 10, 0), test_support::console("A", Some(1)));
    let mut queue = ctx.queue(ctx.options().poll_interval(Duration::from_secs(5)));

    queue.tick().unwrap();
    let event = queue.event_rx.recv().await.unwrap();
    queue.handle_event(event).unwrap();
    queue.tick().unwrap();
    let event = queue.event_rx.recv().await.unwrap();
    queue.handle_event(event).unwrap();

    // The next chunk is not requested until the poll interval passes
    queue.tick().unwrap();
    assert_eq!(ctx.client.requests_to(&console_url("A", 10, 1)), 0);

    ctx.clock.advance(Duration::from_secs(5));
    queue.tick().unwrap();
    let event = queue.event_rx.recv().await.unwrap();
    assert!(matches!(event, Event::ConsoleFetched { ref url, .. } if url == &console_url("A", 10, 1)));
}
