// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

fn write_zip(path: &Path, files: &[(&str, &str)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, contents) in files {
        zip.start_file(*name, zip::write::SimpleFileOptions::default()).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[tokio::test]
async fn extracts_every_entry() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("team-results.zip");
    write_zip(&archive, &[("junit.xml", "<testsuite/>"), ("coverage/index.html", "<html/>")]);

    let entries = extract(&archive, dir.path()).await.unwrap();

    assert_eq!(entries, 2);
    let junit = std::fs::read_to_string(dir.path().join("junit.xml")).unwrap();
    assert_eq!(junit, "<testsuite/>");
    assert!(dir.path().join("coverage/index.html").exists());
}

#[tokio::test]
async fn rejects_non_zip_file() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("team-results.zip");
    std::fs::write(&archive, "<html>Jenkins error page</html>").unwrap();

    let err = extract(&archive, dir.path()).await.unwrap_err();
    assert!(matches!(err, ArchiveError::Zip { .. }));
}

#[tokio::test]
async fn missing_archive_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = extract(&dir.path().join("absent.zip"), dir.path()).await.unwrap_err();
    assert!(matches!(err, ArchiveError::Open { .. }));
}
