// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-visible output through the build agent's logging commands

use jkq_core::TaskResult;
use std::io::Write;
use std::path::Path;

/// Where console text, warnings and the final result go.
///
/// Diagnostics belong in `tracing`; this is what the person watching the
/// build sees.
pub trait Reporter: Clone + Send + Sync + 'static {
    fn console(&self, text: &str);
    fn warning(&self, message: &str);
    /// Attach a markdown summary to the build
    fn attach_summary(&self, name: &str, path: &Path);
    /// Final outcome of the task
    fn complete(&self, result: TaskResult, message: &str);
}

/// Writes `##vso[...]` logging commands to stdout
#[derive(Clone, Copy, Debug, Default)]
pub struct VsoReporter;

impl VsoReporter {
    pub fn new() -> Self {
        Self
    }

    fn emit(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{line}") {
            tracing::warn!(error = %e, "failed to write to stdout");
        }
    }
}

impl Reporter for VsoReporter {
    fn console(&self, text: &str) {
        self.emit(text);
    }

    fn warning(&self, message: &str) {
        self.emit(&format_command("task.logissue", &[("type", "warning")], message));
    }

    fn attach_summary(&self, name: &str, path: &Path) {
        let line = format_command(
            "task.addattachment",
            &[("type", "Distributedtask.Core.Summary"), ("name", name)],
            &path.display().to_string(),
        );
        self.emit(&line);
    }

    fn complete(&self, result: TaskResult, message: &str) {
        let result = result.to_string();
        self.emit(&format_command("task.complete", &[("result", &result)], message));
    }
}

/// `##vso[command key=value;]data`
pub fn format_command(command: &str, properties: &[(&str, &str)], data: &str) -> String {
    let properties: String = properties
        .iter()
        .map(|(key, value)| format!("{key}={};", escape_property(value)))
        .collect();
    let separator = if properties.is_empty() { "" } else { " " };
    format!("##vso[{command}{separator}{properties}]{}", escape_data(data))
}

/// Escape command data so it stays on one line
pub fn escape_data(data: &str) -> String {
    data.replace('%', "%AZP25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(']', "%5D").replace(';', "%3B")
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::Reporter;
    use jkq_core::TaskResult;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Recorded output
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ReportCall {
        Console(String),
        Warning(String),
        Attachment { name: String, path: PathBuf },
        Complete { result: TaskResult, message: String },
    }

    /// Fake reporter for testing
    #[derive(Clone, Default)]
    pub struct FakeReporter {
        calls: Arc<Mutex<Vec<ReportCall>>>,
    }

    impl FakeReporter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all recorded output
        pub fn calls(&self) -> Vec<ReportCall> {
            self.calls.lock().clone()
        }

        pub fn console_lines(&self) -> Vec<String> {
            self.calls
                .lock()
                .iter()
                .filter_map(|call| match call {
                    ReportCall::Console(text) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn warnings(&self) -> Vec<String> {
            self.calls
                .lock()
                .iter()
                .filter_map(|call| match call {
                    ReportCall::Warning(text) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn completion(&self) -> Option<(TaskResult, String)> {
            self.calls.lock().iter().rev().find_map(|call| match call {
                ReportCall::Complete { result, message } => Some((*result, message.clone())),
                _ => None,
            })
        }

        pub fn attachments(&self) -> Vec<PathBuf> {
            self.calls
                .lock()
                .iter()
                .filter_map(|call| match call {
                    ReportCall::Attachment { path, .. } => Some(path.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Reporter for FakeReporter {
        fn console(&self, text: &str) {
            self.calls.lock().push(ReportCall::Console(text.to_string()));
        }

        fn warning(&self, message: &str) {
            self.calls.lock().push(ReportCall::Warning(message.to_string()));
        }

        fn attach_summary(&self, name: &str, path: &Path) {
            self.calls
                .lock()
                .push(ReportCall::Attachment { name: name.to_string(), path: path.to_path_buf() });
        }

        fn complete(&self, result: TaskResult, message: &str) {
            self.calls.lock().push(ReportCall::Complete { result, message: message.to_string() });
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeReporter, ReportCall};

#[cfg(test)]
#[path = "reporter_tests.rs"]
mod tests;
