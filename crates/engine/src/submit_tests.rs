// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use jkq_adapters::{FakeJenkinsClient, FakeReporter, JenkinsCall};
use jkq_core::{HttpError, Response};
use std::time::Duration;
use yare::parameterized;

const CRUMB_URL: &str =
    "http://jenkins/crumbIssuer/api/xml?xpath=concat(//crumbRequestField,%22:%22,//crumb)";
const TEAM_URL: &str = "http://jenkins/job/A/team-build/build";
const BUILD_URL: &str = "http://jenkins/job/A/build?delay=0";
const QUEUE_URL: &str = "http://jenkins/queue/item/5/api/json";

fn options() -> TaskOptions {
    TaskOptions::new("http://jenkins", "A").poll_interval(Duration::ZERO)
}

fn posts(client: &FakeJenkinsClient) -> Vec<JenkinsCall> {
    client.calls().into_iter().filter(|c| matches!(c, JenkinsCall::PostForm { .. })).collect()
}

#[parameterized(
    simple = { &["a=1"], &[("a", "1")] },
    trimmed = { &["  name = some value  "], &[("name", "some value")] },
    equals_in_value = { &["url=http://x?y=z"], &[("url", "http://x?y=z")] },
    empty_value = { &["flag="], &[("flag", "")] },
)]
fn parses_parameters(lines: &[&str], expected: &[(&str, &str)]) {
    let parsed = parse_job_parameters(lines).unwrap();
    let pairs: Vec<(&str, &str)> =
        parsed.iter().map(|p| (p.name.as_str(), p.value.as_str())).collect();
    assert_eq!(pairs, expected);
}

#[parameterized(
    no_equals = { "novalue" },
    empty_name = { "=value" },
    blank_name = { "  =value" },
)]
fn rejects_malformed_parameter(line: &str) {
    let err = parse_job_parameters(&[line]).unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidParameter(ref l) if l == line));
    assert!(err.to_string().ends_with(&format!("Invalid parameter line: {line}")));
}

#[tokio::test(start_paused = true)]
async fn falls_back_to_native_endpoint_without_plugin() {
    let client = FakeJenkinsClient::new();
    client.respond(
        BUILD_URL,
        Response::new(201).with_header("location", "http://jenkins/queue/item/5/"),
    );
    let reporter = FakeReporter::new();
    let mut options = options();

    let queue_url = submit_job(&client, &reporter, &mut options).await.unwrap();

    assert_eq!(queue_url, QUEUE_URL);
    assert!(!options.team_build_plugin_available);
    assert!(reporter.console_lines()[0].starts_with("Install the \"Team Foundation Server Plug-in\""));
    let posts = posts(&client);
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].url(), TEAM_URL);
    assert_eq!(posts[1].url(), BUILD_URL);
}

#[tokio::test(start_paused = true)]
async fn plugin_endpoint_returns_created_item() {
    let client = FakeJenkinsClient::new();
    client.respond(
        TEAM_URL,
        Response::new(201).with_body(r#"{"created":"http://jenkins/queue/item/5/"}"#),
    );
    let reporter = FakeReporter::new();
    let mut options = options();

    let queue_url = submit_job(&client, &reporter, &mut options).await.unwrap();

    assert_eq!(queue_url, QUEUE_URL);
    assert!(options.team_build_plugin_available);
    assert!(reporter.console_lines().is_empty());
}

#[tokio::test(start_paused = true)]
async fn crumb_is_sent_as_header() {
    let client = FakeJenkinsClient::new();
    client.respond(CRUMB_URL, Response::new(200).with_body("Jenkins-Crumb:abc123"));
    client.respond(
        TEAM_URL,
        Response::new(201).with_body(r#"{"created":"http://jenkins/queue/item/5/"}"#),
    );
    let mut options = options();

    submit_job(&client, &FakeReporter::new(), &mut options).await.unwrap();

    let JenkinsCall::PostForm { headers, form, .. } = &posts(&client)[0] else {
        panic!("expected a post");
    };
    assert_eq!(headers, &vec![("Jenkins-Crumb".to_string(), "abc123".to_string())]);
    assert_eq!(form[0].0, "json");
}

#[tokio::test(start_paused = true)]
async fn parameters_are_posted_to_parameterized_endpoint() {
    let url = "http://jenkins/job/A/buildWithParameters?delay=0";
    let client = FakeJenkinsClient::new();
    client.respond(url, Response::new(201).with_header("location", "http://jenkins/queue/item/5"));
    let mut options = options()
        .parameterized_job(true)
        .job_parameters(parse_job_parameters(&["branch=main"]).unwrap());

    let queue_url = submit_job(&client, &FakeReporter::new(), &mut options).await.unwrap();

    assert_eq!(queue_url, QUEUE_URL);
    let JenkinsCall::PostForm { form, .. } = &posts(&client)[1] else {
        panic!("expected a post");
    };
    assert_eq!(form, &vec![("branch".to_string(), "main".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn reset_retries_submission() {
    let client = FakeJenkinsClient::new();
    client
        .fail(TEAM_URL, HttpError::ConnectionReset("ECONNRESET".into()))
        .respond(TEAM_URL, Response::new(201).with_body(r#"{"created":"http://jenkins/queue/item/5/"}"#));
    let mut options = options();

    let queue_url = submit_job(&client, &FakeReporter::new(), &mut options).await.unwrap();

    assert_eq!(queue_url, QUEUE_URL);
    assert_eq!(client.requests_to(TEAM_URL), 2);
    assert_eq!(client.requests_to(CRUMB_URL), 2);
}

#[tokio::test(start_paused = true)]
async fn rejected_submission_is_fatal() {
    let client = FakeJenkinsClient::new();
    client.respond(TEAM_URL, Response::new(403).with_body("denied"));
    let mut options = options();

    let err = submit_job(&client, &FakeReporter::new(), &mut options).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Job creation failed. HTTP 403 from http://jenkins/job/A/team-build/build: denied"
    );
}

#[tokio::test(start_paused = true)]
async fn crumb_failure_is_fatal() {
    let client = FakeJenkinsClient::new();
    client.respond(CRUMB_URL, Response::new(500).with_body("boom"));
    let mut options = options();

    let err = submit_job(&client, &FakeReporter::new(), &mut options).await.unwrap_err();

    assert!(err.to_string().starts_with("Crumb request failed. HTTP 500"));
}

#[tokio::test(start_paused = true)]
async fn waits_for_an_executable() {
    let client = FakeJenkinsClient::new();
    client
        .respond(QUEUE_URL, Response::new(200).with_body(r#"{"task":{"name":"A","url":"http://jenkins/job/A/"}}"#))
        .respond(
            QUEUE_URL,
            Response::new(200).with_body(
                r#"{"task":{"name":"A","url":"http://jenkins/job/A/"},
                    "executable":{"number":10,"url":"http://jenkins/job/A/10/"}}"#,
            ),
        );

    let root = poll_root_job(&client, &options(), QUEUE_URL).await.unwrap();

    assert_eq!(
        root,
        RootExecution {
            name: "A".into(),
            task_url: "http://jenkins/job/A/".into(),
            number: 10,
            url: "http://jenkins/job/A/10/".into(),
        }
    );
    assert_eq!(client.requests_to(QUEUE_URL), 2);
}

async fn poll_cancelled(body: &str) -> RuntimeError {
    let client = FakeJenkinsClient::new();
    client.respond(QUEUE_URL, Response::new(200).with_body(body.to_string()));
    poll_root_job(&client, &options(), QUEUE_URL).await.unwrap_err()
}

#[tokio::test]
async fn cancelled_queue_item_is_fatal() {
    let err = poll_cancelled(r#"{"cancelled":true}"#).await;
    assert_eq!(err.to_string(), "Jenkins job canceled.");
}

#[tokio::test]
async fn misspelled_cancel_flag_is_honoured() {
    let err = poll_cancelled(r#"{"canceled":true}"#).await;
    assert!(matches!(err, RuntimeError::JobCanceled));
}

#[tokio::test]
async fn queue_read_failure_is_fatal() {
    let client = FakeJenkinsClient::new();
    let err = poll_root_job(&client, &options(), QUEUE_URL).await.unwrap_err();
    assert!(err.to_string().starts_with("Job progress tracking failed to read job queue. HTTP 404"));
}
