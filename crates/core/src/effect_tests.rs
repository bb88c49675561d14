// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    definition = { Effect::FetchDefinition { job: JobId::new(1), url: "u".into() }, "fetch_definition" },
    build = { Effect::FetchBuild { search: SearchId::new(0), number: 7, url: "u".into() }, "fetch_build" },
    console = { Effect::FetchConsole { job: JobId::new(1), url: "u".into() }, "fetch_console" },
    result = { Effect::FetchResult { job: JobId::new(1), url: "u".into() }, "fetch_result" },
    download = {
        Effect::DownloadResults { job: JobId::new(1), url: "u".into(), dir: PathBuf::from("out") },
        "download_results"
    },
)]
fn effect_names(effect: Effect, name: &str) {
    assert_eq!(effect.name(), name);
    assert_eq!(effect.url(), "u");
}

#[test]
fn fetch_build_fields_identify_search_and_number() {
    let effect = Effect::FetchBuild {
        search: SearchId::new(2),
        number: 41,
        url: "http://jenkins/job/D/41/api/json".into(),
    };
    assert_eq!(
        effect.fields(),
        vec![
            ("search", "search-2".to_string()),
            ("number", "41".to_string()),
            ("url", "http://jenkins/job/D/41/api/json".to_string()),
        ]
    );
}
