//! Shared test utilities for wv-cli integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// Get a Command for the wv binary with a clean environment.
///
/// # Panics
///
/// Panics if the wv binary cannot be found. This should not happen
/// in a properly configured test environment.
pub fn wv_cmd() -> Command {
    let mut cmd = Command::cargo_bin("wv").expect("wv binary should exist");
    // Isolate tests from the developer's environment.
    cmd.env_remove("WV_CONFIG");
    cmd.env_remove("WV_DB");
    cmd.env_remove("WV_VERBOSE");
    cmd.env_remove("WV_QUIET");
    cmd
}

/// Write a small legacy word document into `dir` and return its path.
///
/// Five words across two lengths, with the tie at 10 points ("bat"/"cat")
/// that exercises deterministic top-N ordering.
pub fn write_legacy_fixture(dir: &Path) -> PathBuf {
    let document = serde_json::json!({
        "3": [
            {"word": "cat", "points": 10, "dict_matches": {"wordle": true}},
            {"word": "bat", "points": 10, "dict_matches": {"sowpods": true, "wwf": true}},
            {"word": "rat", "points": 5}
        ],
        "5": [
            {"word": "apple", "points": 8, "dict_matches": {"otcwl": true}},
            {"word": "zebra", "points": 14}
        ]
    });
    let path = dir.join("database.json");
    std::fs::write(&path, serde_json::to_string_pretty(&document).unwrap())
        .expect("write legacy fixture");
    path
}

/// Migrate the fixture into a fresh store and return (db_path, legacy_path).
pub fn seeded_store(dir: &Path) -> (PathBuf, PathBuf) {
    let db_path = dir.join("words.db");
    let legacy_path = write_legacy_fixture(dir);

    wv_cmd()
        .args(["--db", db_path.to_str().unwrap()])
        .arg("migrate")
        .arg(&legacy_path)
        .assert()
        .success();

    (db_path, legacy_path)
}
