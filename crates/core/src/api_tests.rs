// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn definition_without_last_build_starts_at_one() {
    let def: JobDefinition = serde_json::from_value(json!({
        "_class": "hudson.model.FreeStyleProject",
        "downstreamProjects": [],
        "lastBuild": null
    }))
    .unwrap();
    assert_eq!(def.last_build_number(), 1);
}

#[test]
fn disabled_downstream_projects_are_skipped() {
    let def: JobDefinition = serde_json::from_value(json!({
        "downstreamProjects": [
            { "name": "B", "url": "http://jenkins/job/B/", "color": "blue" },
            { "name": "C", "url": "http://jenkins/job/C/", "color": "disabled" },
            { "name": "D", "url": "http://jenkins/job/D/" }
        ],
        "lastBuild": { "number": 12 }
    }))
    .unwrap();

    let names: Vec<_> = def.enabled_downstream().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["B", "D"]);
    assert_eq!(def.last_build_number(), 12);
}

#[test]
fn causes_come_from_first_action_that_has_them() {
    let build: Build = serde_json::from_value(json!({
        "actions": [
            {},
            null,
            { "_class": "hudson.model.CauseAction", "causes": [
                { "shortDescription": "Started by upstream project \"B\"",
                  "upstreamBuild": 3, "upstreamProject": "B", "upstreamUrl": "job/B/" }
            ]},
            { "causes": [
                { "shortDescription": "Started by user admin" }
            ]}
        ],
        "timestamp": 1700000000000u64
    }))
    .unwrap();

    let causes = build.causes();
    assert_eq!(causes.len(), 1);
    assert_eq!(causes[0].upstream(), Some(("job/B".to_string(), 3)));
    assert_eq!(build.timestamp, Some(1_700_000_000_000));
    assert_eq!(build.result, None);
}

#[test]
fn queue_item_accepts_both_cancel_spellings() {
    let american: QueueItem = serde_json::from_value(json!({ "canceled": true })).unwrap();
    let british: QueueItem = serde_json::from_value(json!({ "cancelled": true })).unwrap();
    let waiting: QueueItem = serde_json::from_value(json!({ "why": "Waiting" })).unwrap();

    assert!(american.is_cancelled());
    assert!(british.is_cancelled());
    assert!(!waiting.is_cancelled());
}

#[test]
fn queue_item_with_executable() {
    let item: QueueItem = serde_json::from_value(json!({
        "task": { "name": "A", "url": "http://jenkins/job/A/" },
        "executable": { "number": 10, "url": "http://jenkins/job/A/10/" }
    }))
    .unwrap();

    let exec = item.executable.unwrap();
    assert_eq!(exec.number, 10);
    assert_eq!(item.task.unwrap().name, "A");
}
