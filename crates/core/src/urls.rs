// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jenkins URL composition and job identifiers

/// Join `segment` onto `base` with exactly one `/` between them.
pub fn add_url_segment(base: &str, segment: &str) -> String {
    match (base.ends_with('/'), segment.starts_with('/')) {
        (true, true) => format!("{}{}", base, &segment[1..]),
        (false, false) => format!("{base}/{segment}"),
        _ => format!("{base}{segment}"),
    }
}

/// Turn a folder-qualified job name into its URL path.
///
/// `"folder/job"` becomes `"/job/folder/job/job"`.
pub fn convert_job_name(name: &str) -> String {
    name.split('/').fold(String::new(), |mut path, part| {
        path.push_str("/job/");
        path.push_str(part);
        path
    })
}

/// Trim surrounding slashes so `"job/A/"` and `"/job/A"` compare equal.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim_matches('/').to_string()
}

/// Stable identifier for a job, comparable with a cause's `upstreamUrl`.
///
/// The server prefix is stripped when the task URL lives under it. Otherwise
/// the path from the first `job/` segment onwards is used, which covers
/// servers that report a different host name than the one configured.
pub fn job_identifier(server_url: &str, task_url: &str) -> String {
    let server = server_url.trim_end_matches('/');
    if let Some(rest) = task_url.strip_prefix(server) {
        if rest.is_empty() || rest.starts_with('/') {
            return normalize_identifier(rest);
        }
    }

    let path = url::Url::parse(task_url)
        .map(|parsed| parsed.path().to_string())
        .unwrap_or_else(|_| task_url.to_string());
    let path = match path.find("job/") {
        Some(index) if index > 0 => &path[index..],
        _ => path.as_str(),
    };
    normalize_identifier(path)
}

#[cfg(test)]
#[path = "urls_tests.rs"]
mod tests;
