// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use jkq_core::{Build, JobConfig, JobState, SearchId};
use yare::parameterized;

fn job(tree: &mut JobTree, name: &str, parent: Option<JobId>) -> JobId {
    let mut config =
        JobConfig::builder(name, format!("http://jenkins/job/{name}/"), format!("job/{name}"));
    if let Some(parent) = parent {
        config = config.parent(parent);
    }
    tree.insert(SearchId::new(tree.len()), config.build())
}

fn finish(tree: &mut JobTree, id: JobId, number: u64, code: &str) {
    tree[id].set_execution(number);
    for state in [JobState::Streaming, JobState::Finishing, JobState::Done] {
        tree.change_state(id, state).unwrap();
    }
    tree[id].result = Some(Build { result: Some(code.to_string()), ..Build::default() });
}

#[test]
fn renders_nested_lists_with_links() {
    let mut tree = JobTree::new();
    let a = job(&mut tree, "A", None);
    let b = job(&mut tree, "B", Some(a));
    finish(&mut tree, a, 10, "SUCCESS");
    finish(&mut tree, b, 3, "FAILURE");

    let expected = "\
<ul style=\"padding-left:0\">
[A #10](http://jenkins/job/A/10) <font color='green'>Success</font><br />
  <ul style=\"padding-left:4\">
  [B #3](http://jenkins/job/B/3) <font color='red'>Failed</font><br />
  </ul>
</ul>
";
    similar_asserts::assert_eq!(render(&tree), expected);
}

#[test]
fn joined_jobs_appear_once() {
    let mut tree = JobTree::new();
    let a = job(&mut tree, "A", None);
    let b = job(&mut tree, "B", Some(a));
    let c = job(&mut tree, "C", Some(a));
    let d_under_b = job(&mut tree, "D", Some(b));
    let d_under_c = job(&mut tree, "D", Some(c));
    finish(&mut tree, d_under_b, 7, "SUCCESS");
    tree.set_joined(d_under_c, d_under_b).unwrap();

    let summary = render(&tree);

    assert_eq!(summary.matches("[D #7]").count(), 1);
    assert!(summary.contains("C <font color='red'>Unknown</font>"));
}

#[test]
fn joined_job_is_shown_as_its_target_where_first_reached() {
    let mut tree = JobTree::new();
    let a = job(&mut tree, "A", None);
    let b = job(&mut tree, "B", Some(a));
    let c = job(&mut tree, "C", Some(a));
    let d_under_b = job(&mut tree, "D", Some(b));
    let d_under_c = job(&mut tree, "D", Some(c));
    let e = job(&mut tree, "E", Some(d_under_c));
    finish(&mut tree, d_under_c, 7, "SUCCESS");
    finish(&mut tree, e, 2, "SUCCESS");
    tree.set_joined(d_under_b, d_under_c).unwrap();

    let summary = render(&tree);

    let expected = "\
<ul style=\"padding-left:0\">
A <font color='red'>Unknown</font><br />
  <ul style=\"padding-left:4\">
  B <font color='red'>Unknown</font><br />
    <ul style=\"padding-left:8\">
    [D #7](http://jenkins/job/D/7) <font color='green'>Success</font><br />
      <ul style=\"padding-left:12\">
      [E #2](http://jenkins/job/E/2) <font color='green'>Success</font><br />
      </ul>
    </ul>
  </ul>
  <ul style=\"padding-left:4\">
  C <font color='red'>Unknown</font><br />
  </ul>
</ul>
";
    similar_asserts::assert_eq!(summary, expected);
}

#[test]
fn unlocated_job_has_no_link() {
    let mut tree = JobTree::new();
    job(&mut tree, "A", None);
    assert!(render(&tree).contains("\nA <font color='red'>Unknown</font><br />\n"));
}

#[parameterized(
    plain = { "A", Some(10), "JenkinsJob_A_10.md" },
    folder = { "folder/A", Some(10), "JenkinsJob_folder_A_10.md" },
    no_execution = { "A", None, "JenkinsJob_A.md" },
)]
fn summary_file_name(name: &str, number: Option<u64>, expected: &str) {
    let mut tree = JobTree::new();
    let id = job(&mut tree, name, None);
    if let Some(number) = number {
        tree[id].set_execution(number);
    }
    assert_eq!(file_name(&tree), expected);
}

#[tokio::test]
async fn write_creates_the_directory() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested");
    let mut tree = JobTree::new();
    let a = job(&mut tree, "A", None);
    finish(&mut tree, a, 10, "SUCCESS");

    let path = write(&tree, &target).await.unwrap();

    assert_eq!(path, target.join("JenkinsJob_A_10.md"));
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("[A #10]"));
}
