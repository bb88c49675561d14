// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn parse(extra: &[&str]) -> Args {
    let mut argv = vec!["jkq", "--server-url", "http://jenkins", "--job-name", "folder/A"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

#[test]
fn defaults() {
    let options = parse(&[]).task_options().unwrap();

    assert!(options.capture_console);
    assert!(options.capture_pipeline);
    assert!(options.strict_ssl);
    assert!(!options.parameterized_job);
    assert!(!options.fail_on_unstable_result);
    assert_eq!(options.poll_interval, Duration::from_millis(5000));
    assert_eq!(options.save_results_to, PathBuf::from("jenkinsResults"));
    assert_eq!(options.job_url(), "http://jenkins/job/folder/job/A");
}

#[parameterized(
    both_on = { "true", "true", true },
    pipeline_off = { "true", "false", false },
    console_off = { "false", "true", false },
)]
fn pipeline_capture_needs_console_capture(console: &str, pipeline: &str, expected: bool) {
    let options = parse(&["--capture-console", console, "--capture-pipeline", pipeline])
        .task_options()
        .unwrap();
    assert_eq!(options.capture_pipeline, expected);
}

#[test]
fn parameters_only_apply_to_parameterized_jobs() {
    let plain = parse(&["--job-parameter", "a=1"]).task_options().unwrap();
    assert!(plain.job_parameters.is_empty());

    let parameterized = parse(&[
        "--parameterized-job",
        "true",
        "--job-parameter",
        "a=1\n\nb = two",
    ])
    .task_options()
    .unwrap();
    let names: Vec<&str> = parameterized.job_parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(parameterized.job_parameters[1].value, "two");
}

#[test]
fn malformed_parameter_is_rejected() {
    let err = parse(&["--parameterized-job", "true", "--job-parameter", "novalue"])
        .task_options()
        .unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidParameter(line) if line == "novalue"));
}

#[test]
fn password_is_masked_in_debug_output() {
    let options = parse(&["--password", "hunter2"]).task_options().unwrap();
    assert!(!format!("{options:?}").contains("hunter2"));
}
