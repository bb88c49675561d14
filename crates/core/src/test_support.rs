// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canned Jenkins responses for tests in this and other crates

use crate::http::Response;
use serde_json::{json, Value};

fn json_response(value: Value) -> Response {
    Response::new(200)
        .with_header("content-type", "application/json")
        .with_body(value.to_string())
}

pub fn not_found() -> Response {
    Response::new(404).with_body("Not Found")
}

/// `<task>/api/json` listing downstream job names on server `http://jenkins`
pub fn definition(downstream: &[&str], last_build: Option<u64>) -> Response {
    let projects: Vec<Value> = downstream
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "url": format!("http://jenkins/job/{name}/"),
                "color": "blue"
            })
        })
        .collect();
    let last_build = last_build.map(|number| json!({ "number": number }));
    json_response(json!({ "downstreamProjects": projects, "lastBuild": last_build }))
}

/// `<task>/<n>/api/json` triggered by the given `(job name, build)` pairs
pub fn build_with_causes(upstream: &[(&str, u64)], timestamp: u64) -> Response {
    let causes: Vec<Value> = upstream
        .iter()
        .map(|(name, number)| {
            json!({
                "shortDescription": format!("Started by upstream project \"{name}\" build number {number}"),
                "upstreamBuild": number,
                "upstreamProject": name,
                "upstreamUrl": format!("job/{name}/")
            })
        })
        .collect();
    json_response(json!({
        "actions": [{}, { "_class": "hudson.model.CauseAction", "causes": causes }],
        "timestamp": timestamp
    }))
}

/// One chunk of progressive console text. `more` carries the next offset.
pub fn console(text: &str, more: Option<u64>) -> Response {
    let response = Response::new(200).with_body(text);
    match more {
        Some(size) => {
            response.with_header("x-more-data", "true").with_header("x-text-size", size.to_string())
        }
        None => response.with_header("x-text-size", text.len().to_string()),
    }
}

/// `<run>/api/json`; `None` means the build is still running
pub fn result(code: Option<&str>, timestamp: u64) -> Response {
    json_response(json!({ "result": code, "timestamp": timestamp }))
}
