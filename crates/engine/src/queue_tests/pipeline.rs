// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Downstream discovery, build search and joins

use super::*;

fn pipeline_options(ctx: &TestContext) -> TaskOptions {
    ctx.options().capture_pipeline(true)
}

fn states(jobs: &[&jkq_core::Job]) -> Vec<JobState> {
    let mut states: Vec<JobState> = jobs.iter().map(|job| job.state).collect();
    states.sort_by_key(|state| state.to_string());
    states
}

/// A triggers B and C, which both trigger D. Jenkins coalesced the two
/// requests for D into build 7, which in turn triggered E.
fn script_diamond(ctx: &TestContext) {
    ctx.script_job("A", 10, &["B", "C"], "SUCCESS");
    ctx.script_job("B", 3, &["D"], "SUCCESS");
    ctx.script_job("C", 4, &["D"], "SUCCESS");
    ctx.script_job("D", 7, &["E"], "SUCCESS");
    ctx.script_job("E", 2, &[], "SUCCESS");
    ctx.client
        .respond(&build_url("B", 3), test_support::build_with_causes(&[("A", 10)], 2000))
        .respond(&build_url("C", 4), test_support::build_with_causes(&[("A", 10)], 2000))
        .respond(&build_url("D", 7), test_support::build_with_causes(&[("B", 3), ("C", 4)], 3000))
        .respond(&build_url("E", 2), test_support::build_with_causes(&[("D", 7)], 4000));
}

#[tokio::test(start_paused = true)]
async fn tracks_downstream_jobs_to_completion() {
    let ctx = TestContext::new();
    ctx.script_job("A", 10, &["B"], "SUCCESS");
    ctx.script_job("B", 3, &[], "SUCCESS");
    ctx.client.respond(&build_url("B", 3), test_support::build_with_causes(&[("A", 10)], 2000));
    let mut queue = ctx.queue(pipeline_options(&ctx));

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Succeeded);
    assert_eq!(report.message, "Jenkins pipeline complete");
    let b = ctx.job_named(&queue, "B");
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].state, JobState::Done);
    assert_eq!(b[0].execution_url.as_deref(), Some("http://jenkins/job/B/3"));
    assert_eq!(b[0].parent, Some(queue.tree().root().unwrap().id));
    assert!(ctx.reporter.console_lines().iter().any(|line| line.contains("Jenkins job started: B")));
}

#[tokio::test(start_paused = true)]
async fn coalesced_build_is_followed_once() {
    let ctx = TestContext::new();
    script_diamond(&ctx);
    let mut queue = ctx.queue(pipeline_options(&ctx));

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Succeeded);
    let d = ctx.job_named(&queue, "D");
    assert_eq!(states(&d), [JobState::Done, JobState::Joined]);
    let main = d.iter().find(|job| job.state == JobState::Done).unwrap();
    let joined = d.iter().find(|job| job.state == JobState::Joined).unwrap();
    assert_eq!(joined.joined, Some(main.id));
    assert_eq!(queue.tree().working_job(joined.id), main.id);

    // The joined branch never runs its own downstream jobs
    let e = ctx.job_named(&queue, "E");
    assert_eq!(states(&e), [JobState::Cut, JobState::Done]);
    let cut = e.iter().find(|job| job.state == JobState::Cut).unwrap();
    assert_eq!(cut.parent, Some(joined.id));

    // D was fetched once per build, not once per tracked job
    assert_eq!(ctx.client.requests_to(&console_url("D", 7, 0)), 1);
    assert_eq!(ctx.client.requests_to(&result_url("D", 7)), 1);

    let summary = std::fs::read_to_string(report.summary.unwrap()).unwrap();
    assert_eq!(summary.matches("[D #7]").count(), 1);
    assert_eq!(summary.matches("[E #2]").count(), 1);
}

/// D #7 names C first, so the D under C becomes the main job. Its own
/// definition answer is slow, so it is already streaming when that answer
/// arrives. Its downstream E must still be followed.
#[tokio::test(start_paused = true)]
async fn job_promoted_before_its_definition_arrives_still_spawns_downstream() {
    let ctx = TestContext::new();
    ctx.script_job("A", 10, &["B", "C"], "SUCCESS");
    ctx.script_job("B", 3, &["D"], "SUCCESS");
    ctx.script_job("C", 4, &["D"], "SUCCESS");
    ctx.script_job("E", 2, &[], "SUCCESS");
    ctx.client
        .respond(&definition_url("D"), test_support::definition(&["E"], Some(7)))
        .respond_after(
            &definition_url("D"),
            Duration::from_secs(30),
            test_support::definition(&["E"], Some(7)),
        )
        .respond(&console_url("D", 7, 0), test_support::console("D", None))
        .respond(&result_url("D", 7), test_support::result(Some("SUCCESS"), 1007))
        .respond(&build_url("B", 3), test_support::build_with_causes(&[("A", 10)], 2000))
        .respond(&build_url("C", 4), test_support::build_with_causes(&[("A", 10)], 2000))
        .respond(&build_url("D", 7), test_support::build_with_causes(&[("C", 4), ("B", 3)], 3000))
        .respond(&build_url("E", 2), test_support::build_with_causes(&[("D", 7)], 4000));
    let mut queue = ctx.queue(pipeline_options(&ctx));

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Succeeded);
    let d = ctx.job_named(&queue, "D");
    assert_eq!(states(&d), [JobState::Done, JobState::Joined]);
    let main = d.iter().find(|job| job.state == JobState::Done).unwrap();
    assert!(main.downstream_spawned);

    let e = ctx.job_named(&queue, "E");
    let followed: Vec<_> = e.iter().filter(|job| job.state == JobState::Done).collect();
    assert_eq!(followed.len(), 1);
    assert_eq!(followed[0].parent, Some(main.id));
    assert_eq!(followed[0].execution_number, Some(2));
    assert_eq!(e.iter().filter(|job| job.parent == Some(main.id)).count(), 1);
}

#[tokio::test(start_paused = true)]
async fn children_wait_for_their_parent_to_finish() {
    let ctx = TestContext::new();
    ctx.script_job("B", 3, &[], "SUCCESS");
    ctx.client
        .respond(&definition_url("A"), test_support::definition(&["B"], Some(10)))
        .respond(&console_url("A", 10, 0), test_support::console("A", None))
        .respond(&result_url("A", 10), test_support::result(None, 1000))
        .respond(&result_url("A", 10), test_support::result(Some("SUCCESS"), 1000))
        .respond(&build_url("B", 3), test_support::build_with_causes(&[("A", 10)], 2000));
    let mut queue = ctx.queue(pipeline_options(&ctx));

    ctx.run(&mut queue).await;

    let calls = ctx.client.calls();
    let position = |url: &str| calls.iter().position(|call| call.url() == url).unwrap();
    let root_result = calls
        .iter()
        .rposition(|call| call.url() == result_url("A", 10))
        .unwrap();
    assert!(position(&build_url("B", 3)) > root_result);
    assert!(matches!(calls[position(&build_url("B", 3))], JenkinsCall::Get { .. }));
}

#[tokio::test(start_paused = true)]
async fn search_walks_back_to_the_triggered_build() {
    let ctx = TestContext::new();
    ctx.script_job("A", 10, &["B"], "SUCCESS");
    ctx.client
        .respond(&definition_url("B"), test_support::definition(&[], Some(5)))
        .respond(&build_url("B", 5), test_support::build_with_causes(&[("Other", 1)], 2000))
        .respond(&build_url("B", 4), test_support::build_with_causes(&[("A", 10)], 1500))
        .respond(&console_url("B", 4, 0), test_support::console("B", None))
        .respond(&result_url("B", 4), test_support::result(Some("SUCCESS"), 1500));
    let mut queue = ctx.queue(pipeline_options(&ctx));

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Succeeded);
    assert_eq!(ctx.job_named(&queue, "B")[0].execution_number, Some(4));
    assert_eq!(ctx.client.requests_to(&build_url("B", 5)), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_child_stops_the_pipeline() {
    let ctx = TestContext::new();
    ctx.script_job("A", 10, &["B"], "SUCCESS");
    ctx.script_job("B", 3, &[], "FAILURE");
    ctx.client.respond(&build_url("B", 3), test_support::build_with_causes(&[("A", 10)], 2000));
    let mut queue = ctx.queue(pipeline_options(&ctx));

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Failed);
    assert_eq!(report.message, "Jenkins pipeline failed");
}

#[tokio::test(start_paused = true)]
async fn disabled_downstream_projects_are_skipped() {
    let ctx = TestContext::new();
    ctx.client
        .respond(
            &definition_url("A"),
            Response::new(200).with_body(
                r#"{"downstreamProjects":[{"name":"B","url":"http://jenkins/job/B/","color":"disabled"}],
                    "lastBuild":{"number":10}}"#,
            ),
        )
        .respond(&console_url("A", 10, 0), test_support::console("A", None))
        .respond(&result_url("A", 10), test_support::result(Some("SUCCESS"), 1000));
    let mut queue = ctx.queue(pipeline_options(&ctx));

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.result, TaskResult::Succeeded);
    assert_eq!(queue.tree().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn downstream_jobs_ignored_without_pipeline_capture() {
    let ctx = TestContext::new();
    ctx.script_job("A", 10, &["B"], "SUCCESS");
    let mut queue = ctx.queue(ctx.options());

    let report = ctx.run(&mut queue).await;

    assert_eq!(report.message, "Jenkins job complete");
    assert_eq!(queue.tree().len(), 1);
    assert!(!ctx.requested("/job/B/"));
}
