// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    both_slashes = { "http://jenkins/", "/job/A", "http://jenkins/job/A" },
    base_slash = { "http://jenkins/", "job/A", "http://jenkins/job/A" },
    segment_slash = { "http://jenkins", "/job/A", "http://jenkins/job/A" },
    no_slashes = { "http://jenkins", "job/A", "http://jenkins/job/A" },
    numeric = { "http://jenkins/job/D/", "7", "http://jenkins/job/D/7" },
)]
fn add_url_segment_joins_once(base: &str, segment: &str, expected: &str) {
    assert_eq!(add_url_segment(base, segment), expected);
}

#[parameterized(
    plain = { "build", "/job/build" },
    folder = { "team/build", "/job/team/job/build" },
    nested = { "a/b/c", "/job/a/job/b/job/c" },
)]
fn convert_job_name_expands_folders(name: &str, expected: &str) {
    assert_eq!(convert_job_name(name), expected);
}

#[parameterized(
    under_server = { "http://jenkins", "http://jenkins/job/A/", "job/A" },
    server_trailing_slash = { "http://jenkins/", "http://jenkins/job/A/", "job/A" },
    context_path = { "http://host/ci", "http://host/ci/job/f/job/A/", "job/f/job/A" },
    other_host = { "http://jenkins", "http://jenkins.internal:8080/ci/job/A/", "job/A" },
)]
fn job_identifier_strips_server(server: &str, task_url: &str, expected: &str) {
    assert_eq!(job_identifier(server, task_url), expected);
}

#[test]
fn normalized_upstream_url_matches_identifier() {
    let identifier = job_identifier("http://jenkins", "http://jenkins/job/B/");
    assert_eq!(normalize_identifier("job/B/"), identifier);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn job_url_identifier_matches_upstream_url(name in "[a-z][a-z0-9_-]{0,7}(/[a-z][a-z0-9_-]{0,7}){0,2}") {
            let path = convert_job_name(&name);
            let task_url = format!("http://jenkins{path}/");
            // Causes report `upstreamUrl` relative to the server, e.g. "job/a/job/b/"
            let upstream_url = format!("{}/", path.trim_start_matches('/'));
            prop_assert_eq!(job_identifier("http://jenkins", &task_url), normalize_identifier(&upstream_url));
        }

        #[test]
        fn add_url_segment_never_doubles_slashes(base in "http://[a-z]{1,8}/?", segment in "/?[a-z0-9]{1,8}") {
            let joined = add_url_segment(&base, &segment);
            prop_assert!(!joined["http://".len()..].contains("//"));
            prop_assert!(joined.ends_with(segment.trim_start_matches('/')));
        }
    }
}
