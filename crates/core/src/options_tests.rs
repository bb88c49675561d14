// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults() {
    let options = TaskOptions::new("http://jenkins", "A");
    assert!(options.capture_console);
    assert!(options.capture_pipeline);
    assert!(options.strict_ssl);
    assert!(!options.team_build_plugin_available);
    assert_eq!(options.poll_interval, Duration::from_millis(5000));
    assert_eq!(options.save_results_to, PathBuf::from("jenkinsResults"));
}

#[test]
fn folder_job_urls() {
    let options = TaskOptions::new("http://jenkins/", "team/build");
    assert_eq!(options.job_url(), "http://jenkins/job/team/job/build");
    assert_eq!(options.job_queue_url(), "http://jenkins/job/team/job/build/build?delay=0");
    assert_eq!(options.team_job_queue_url(), "http://jenkins/job/team/job/build/team-build/build");
}

#[test]
fn parameterized_job_uses_build_with_parameters() {
    let options = TaskOptions::new("http://jenkins", "A").parameterized_job(true);
    assert_eq!(options.job_queue_url(), "http://jenkins/job/A/buildWithParameters?delay=0");
}

#[test]
fn debug_masks_password() {
    let options = TaskOptions::new("http://jenkins", "A").username("admin").password("hunter2");
    let debug = format!("{options:?}");
    assert!(debug.contains("admin"));
    assert!(!debug.contains("hunter2"));
}
