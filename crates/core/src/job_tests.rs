// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn job(state: JobState, result: Option<&str>) -> Job {
    let config = JobConfig::builder("A", "http://jenkins/job/A/", "job/A").build();
    let mut job = Job::new(JobId::new(0), SearchId::new(0), config);
    job.state = state;
    job.result =
        result.map(|code| Build { result: Some(code.to_string()), ..Build::default() });
    job
}

#[test]
fn console_holds_text_until_enabled() {
    let mut console = Console::default();
    assert!(!console.log("one "));
    assert!(!console.log("two"));

    assert_eq!(console.enable(), Some("one two".to_string()));
    assert!(console.log(" three"));
    assert_eq!(console.buffer(), "one two three");
}

#[test]
fn console_enable_flushes_once() {
    let mut console = Console::default();
    console.log("text");
    assert!(console.enable().is_some());
    assert_eq!(console.enable(), None);
}

#[test]
fn empty_console_enables_without_output() {
    let mut console = Console::default();
    assert_eq!(console.enable(), None);
    assert!(console.is_enabled());
}

#[test]
fn console_offset_never_moves_back() {
    let mut console = Console::default();
    console.advance_to(120);
    console.advance_to(80);
    assert_eq!(console.offset(), 120);
}

#[parameterized(
    success = { JobState::Done, Some("SUCCESS"), false, TaskResult::Succeeded },
    unstable = { JobState::Done, Some("UNSTABLE"), false, TaskResult::Succeeded },
    unstable_strict = { JobState::Done, Some("UNSTABLE"), true, TaskResult::Failed },
    failure = { JobState::Done, Some("FAILURE"), false, TaskResult::Failed },
    aborted = { JobState::Done, Some("ABORTED"), false, TaskResult::Failed },
    not_built = { JobState::Done, Some("NOT_BUILT"), false, TaskResult::Failed },
    queued = { JobState::Queued, None, false, TaskResult::Succeeded },
    cut = { JobState::Cut, None, false, TaskResult::Failed },
    streaming = { JobState::Streaming, None, false, TaskResult::Failed },
)]
fn task_result_mapping(
    state: JobState,
    code: Option<&str>,
    fail_on_unstable: bool,
    expected: TaskResult,
) {
    assert_eq!(job(state, code).task_result(fail_on_unstable), expected);
}

#[parameterized(
    success = { JobState::Done, Some("SUCCESS"), "Success" },
    unstable = { JobState::Done, Some("UNSTABLE"), "Unstable" },
    failure = { JobState::Done, Some("FAILURE"), "Failed" },
    not_built = { JobState::Done, Some("NOT_BUILT"), "Not built" },
    aborted = { JobState::Done, Some("ABORTED"), "Aborted" },
    raw = { JobState::Done, Some("CUSTOM"), "CUSTOM" },
    queued = { JobState::Queued, None, "Queued" },
    joined = { JobState::Joined, None, "Unknown" },
)]
fn result_labels(state: JobState, code: Option<&str>, expected: &str) {
    assert_eq!(job(state, code).result_label(), expected);
}

#[test]
fn set_execution_derives_run_url() {
    let mut job = job(JobState::Locating, None);
    job.set_execution(7);
    assert_eq!(job.execution_url.as_deref(), Some("http://jenkins/job/A/7"));
    assert_eq!(job.display_name(), "A #7");
}

#[test]
fn root_execution_url_is_kept() {
    let config = JobConfig::builder("A", "http://jenkins/job/A/", "job/A")
        .execution(10, "http://jenkins/job/A/10/")
        .build();
    let mut job = Job::new(JobId::new(0), SearchId::new(0), config);
    job.set_execution(10);
    assert_eq!(job.execution_url.as_deref(), Some("http://jenkins/job/A/10/"));
}

#[test]
fn console_block_frames_message() {
    let block = console_block("Jenkins job started: A");
    let lines: Vec<_> = block.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "*".repeat(78));
    assert_eq!(lines[1], "Jenkins job started: A");
}
