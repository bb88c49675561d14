// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Markdown summary of the job tree attached to the build

use jkq_core::{Job, JobId, JobTree};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

/// Attachment name shown by the host
pub const SUMMARY_NAME: &str = "Jenkins Results";

const INDENT: &str = "  ";
const PADDING_STEP: usize = 4;

/// Render the tree from its root.
///
/// A joined job is shown as the job it was joined to, and each execution is
/// listed once, at the first branch that reaches it.
pub fn render(tree: &JobTree) -> String {
    let mut out = String::new();
    if let Some(root) = tree.root() {
        let mut seen = HashSet::from([root.id]);
        walk(tree, root, "", 0, &mut seen, &mut out);
    }
    out
}

fn walk(
    tree: &JobTree,
    job: &Job,
    indent: &str,
    padding: usize,
    seen: &mut HashSet<JobId>,
    out: &mut String,
) {
    let _ = writeln!(out, "{indent}<ul style=\"padding-left:{padding}\">");
    let label = colorize(&job.result_label());
    match (job.execution_number, job.execution_url.as_deref()) {
        (Some(number), Some(url)) => {
            let _ = writeln!(out, "{indent}[{} #{number}]({url}) {label}<br />", job.name);
        }
        _ => {
            let _ = writeln!(out, "{indent}{} {label}<br />", job.name);
        }
    }

    let child_indent = format!("{indent}{INDENT}");
    for child in &job.children {
        let target = tree.working_job(*child);
        if !seen.insert(target) {
            continue;
        }
        walk(tree, &tree[target], &child_indent, padding + PADDING_STEP, seen, out);
    }
    let _ = writeln!(out, "{indent}</ul>");
}

fn colorize(label: &str) -> String {
    let color = if label == "Success" { "green" } else { "red" };
    format!("<font color='{color}'>{label}</font>")
}

/// Summary file name for the root job, e.g. `JenkinsJob_folder_A_10.md`
pub fn file_name(tree: &JobTree) -> String {
    let Some(root) = tree.root() else {
        return "JenkinsJob.md".to_string();
    };
    let name = root.name.replace('/', "_");
    match root.execution_number {
        Some(number) => format!("JenkinsJob_{name}_{number}.md"),
        None => format!("JenkinsJob_{name}.md"),
    }
}

/// Write the summary into `dir` and return its path
pub async fn write(tree: &JobTree, dir: &Path) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name(tree));
    tokio::fs::write(&path, render(tree)).await?;
    tracing::debug!(path = %path.display(), "summary written");
    Ok(path)
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
