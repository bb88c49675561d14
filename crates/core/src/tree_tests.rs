// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn add(tree: &mut JobTree, name: &str, parent: Option<JobId>) -> JobId {
    let task_url = format!("http://jenkins/job/{name}/");
    let mut config = JobConfig::builder(name, task_url, format!("job/{name}"));
    if let Some(parent) = parent {
        config = config.parent(parent);
    }
    tree.insert(SearchId::new(0), config.build())
}

#[test]
fn insert_links_children_in_order() {
    let mut tree = JobTree::new();
    let a = add(&mut tree, "A", None);
    let b = add(&mut tree, "B", Some(a));
    let c = add(&mut tree, "C", Some(a));

    assert_eq!(tree[a].children, vec![b, c]);
    assert_eq!(tree.root().map(|j| j.id), Some(a));
    assert_eq!(tree.find_child(a, "job/C"), Some(c));
    assert_eq!(tree.find_child(b, "job/C"), None);
}

#[test]
fn illegal_transition_is_rejected_and_state_kept() {
    let mut tree = JobTree::new();
    let a = add(&mut tree, "A", None);

    let err = tree.change_state(a, JobState::Done).unwrap_err();
    assert!(matches!(
        err,
        JobError::InvalidTransition { from: JobState::New, to: JobState::Done, .. }
    ));
    assert_eq!(tree[a].state, JobState::New);
}

#[test]
fn same_state_is_a_no_op() {
    let mut tree = JobTree::new();
    let a = add(&mut tree, "A", None);
    tree.change_state(a, JobState::Locating).unwrap();
    assert!(!tree.change_state(a, JobState::Locating).unwrap());
}

#[test]
fn cut_reaches_every_descendant() {
    let mut tree = JobTree::new();
    let a = add(&mut tree, "A", None);
    let b = add(&mut tree, "B", Some(a));
    let c = add(&mut tree, "C", Some(b));
    let d = add(&mut tree, "D", Some(c));
    tree.change_state(c, JobState::Locating).unwrap();

    tree.cut(b).unwrap();

    assert_eq!(tree[a].state, JobState::New);
    for id in [b, c, d] {
        assert_eq!(tree[id].state, JobState::Cut);
    }
}

#[test]
fn cut_refuses_running_job() {
    let mut tree = JobTree::new();
    let a = add(&mut tree, "A", None);
    tree.change_state(a, JobState::Streaming).unwrap();
    assert!(tree.cut(a).is_err());
}

#[test]
fn set_joined_cuts_children_and_links_target() {
    let mut tree = JobTree::new();
    let a = add(&mut tree, "A", None);
    let b = add(&mut tree, "B", Some(a));
    let c = add(&mut tree, "C", Some(a));
    let d1 = add(&mut tree, "D", Some(b));
    let d2 = add(&mut tree, "D", Some(c));
    let e = add(&mut tree, "E", Some(d2));
    tree.change_state(d1, JobState::Streaming).unwrap();

    tree.set_joined(d2, d1).unwrap();

    assert_eq!(tree[d2].state, JobState::Joined);
    assert_eq!(tree[e].state, JobState::Cut);
    assert_eq!(tree.working_job(d2), d1);
    assert_eq!(tree.working_job(d1), d1);
}

#[test]
fn joining_into_cut_job_fails() {
    let mut tree = JobTree::new();
    let a = add(&mut tree, "A", None);
    let b = add(&mut tree, "B", Some(a));
    let c = add(&mut tree, "C", Some(a));
    tree.cut(b).unwrap();

    let err = tree.set_joined(c, b).unwrap_err();
    assert!(matches!(err, JobError::InvalidJoin { state: JobState::Cut, .. }));
    assert_eq!(tree[c].state, JobState::New);
}

#[test]
fn find_matches_identifier_and_number() {
    let mut tree = JobTree::new();
    let a = add(&mut tree, "A", None);
    let b = add(&mut tree, "B", Some(a));
    tree[b].set_execution(3);

    assert_eq!(tree.find("job/B", 3), Some(b));
    assert_eq!(tree.find("job/B", 4), None);
    assert_eq!(tree.find("job/A", 3), None);
}

#[test]
fn describe_includes_number_and_state() {
    let mut tree = JobTree::new();
    let a = add(&mut tree, "A", None);
    tree[a].set_execution(10);
    assert_eq!(tree.describe(a), "A #10 (New)");
}
