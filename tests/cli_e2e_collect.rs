//! End-to-end tests for the `gitinfo collect` command.
//!
//! Each test clones from a local origin repository and runs with every HTTP
//! endpoint unreachable, so the metadata-derived statistics are always the
//! `"n/a"` sentinel and the documentation mirror is `missing_or_blocked`.

#![cfg(unix)]

#[allow(dead_code)]
mod common;
use common::prelude::*;

use serde_json::Value;
use std::fs;
use std::path::PathBuf;

fn widgets(fixture: &TestFixture) -> OriginRepo {
    let origin = fixture.origin("acme", "widgets");
    origin
        .commit("README.md", "# widgets\n", "Initial commit")
        .commit("Cargo.toml", "[package]\nname = \"widgets\"\n", "Add manifest")
        .commit("src/main.rs", "fn main() {}\n", "Add entry point")
        .commit("docs/guide.md", "guide\n", "Add docs");
    origin
}

fn read_facts(stdout: &str) -> Value {
    let facts = key_value(stdout, "FACTS_FILE").expect("FACTS_FILE line");
    serde_json::from_str(&fs::read_to_string(facts).unwrap()).unwrap()
}

#[test]
fn test_collect_help() {
    cargo_bin_cmd!("gitinfo")
        .args(["collect", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--ref"))
        .stdout(predicate::str::contains("--output-root"))
        .stdout(predicate::str::contains("--max-items"));
}

#[test]
fn test_collect_fresh_clone_writes_run_directory() {
    require_git!();
    let fixture = TestFixture::new();
    let origin = widgets(&fixture);

    let assert = fixture
        .command()
        .args(["collect", "https://github.com/acme/widgets"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    let run_dir = PathBuf::from(key_value(&stdout, "RUN_DIR").unwrap());
    assert!(run_dir.starts_with(fixture.output_root()));
    assert!(run_dir
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("widgets-"));
    assert_eq!(
        key_value(&stdout, "SANITIZED_REPO_URL").as_deref(),
        Some("https://github.com/acme/widgets")
    );
    assert_eq!(
        PathBuf::from(key_value(&stdout, "LOCAL_REPO_PATH").unwrap()),
        fixture.sources_root().join("widgets")
    );
    let head = key_value(&stdout, "HEAD_COMMIT").unwrap();
    assert!(origin.head().starts_with(&head), "{} is not a prefix of HEAD", head);

    let facts = read_facts(&stdout);
    assert_eq!(facts["repo"], "acme/widgets");
    assert_eq!(facts["repoUrl"], "https://github.com/acme/widgets");
    assert_eq!(facts["headCommit"], head.as_str());
    assert_eq!(facts["description"], "n/a");
    assert_eq!(facts["stats"]["stars"], "n/a");
    assert_eq!(facts["stats"]["contributorsSampleCount"], "n/a");
    assert_eq!(facts["stats"]["deepwikiStatus"], "missing_or_blocked");
    assert_eq!(facts["stats"]["lastCommitAuthor"], "Test Author");
    assert_ne!(facts["stats"]["commits30d"], "0");

    let key_files: Vec<&str> = facts["keyFiles"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(key_files.contains(&"README.md"));
    assert!(key_files.contains(&"Cargo.toml"));
    assert!(key_files.contains(&"docs/"));
    assert!(key_files.contains(&"src/main.rs"));

    let tree: Vec<&str> = facts["tree"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(tree.contains(&"src/"));
    assert!(tree.contains(&"src/main.rs"));
    assert!(tree.iter().all(|entry| !entry.starts_with(".git")));

    let raw = run_dir.join("raw");
    for file in [
        "repo.json",
        "repo.http.json",
        "release.json",
        "release.http.json",
        "contributors.json",
        "contributors.http.json",
        "deepwiki.html",
        "deepwiki.http.json",
        "tree.txt",
        "key-files.txt",
    ] {
        assert!(raw.join(file).exists(), "raw/{} missing", file);
    }
    let envelope: Value =
        serde_json::from_str(&fs::read_to_string(raw.join("repo.http.json")).unwrap()).unwrap();
    assert_eq!(envelope["status"], 0);

    let source = facts["stats"]["codeStatsSource"].as_str().unwrap();
    assert!(["scc", "cloc", "file-count"].contains(&source));
    assert!(raw.join(format!("{}.txt", source)).exists());

    let context = fs::read_to_string(key_value(&stdout, "CONTEXT_FILE").unwrap()).unwrap();
    assert!(context.contains("# acme/widgets evidence report"));
    assert!(context.contains("_To be completed._"));
}

#[test]
fn test_collect_existing_workspace_refreshes_in_place() {
    require_git!();
    let fixture = TestFixture::new();
    let origin = widgets(&fixture);

    fixture
        .command()
        .args(["sync", "https://github.com/acme/widgets"])
        .assert()
        .success();

    origin.commit("CHANGELOG.md", "changes\n", "Add changelog");

    let assert = fixture
        .command()
        .args(["collect", "git@github.com:acme/widgets.git"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    assert_eq!(
        PathBuf::from(key_value(&stdout, "LOCAL_REPO_PATH").unwrap()),
        fixture.sources_root().join("widgets")
    );
    let facts = read_facts(&stdout);
    assert_eq!(facts["repoUrl"], "https://github.com/acme/widgets");
    assert!(fixture.sources_root().join("widgets").join(".git").exists());
    assert!(!fixture.sources_root().join("widgets-acme").exists());
}

#[test]
fn test_collect_name_collision_uses_owner_suffix() {
    require_git!();
    let fixture = TestFixture::new();
    widgets(&fixture);
    fixture.existing_workspace("widgets", "https://github.com/other/widgets.git");

    let assert = fixture
        .command()
        .args(["collect", "https://github.com/acme/widgets"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    assert_eq!(
        PathBuf::from(key_value(&stdout, "LOCAL_REPO_PATH").unwrap()),
        fixture.sources_root().join("widgets-acme")
    );
    // The unrelated working copy is left alone
    assert!(fixture.sources_root().join("widgets/NOTES.md").exists());
    assert!(!fixture.sources_root().join("widgets/Cargo.toml").exists());
}

#[test]
fn test_collect_survey_limits_from_flags() {
    require_git!();
    let fixture = TestFixture::new();
    widgets(&fixture);

    let assert = fixture
        .command()
        .args(["collect", "https://github.com/acme/widgets", "--max-depth", "1", "--max-items", "2"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    let facts = read_facts(&stdout);
    let tree = facts["tree"].as_array().unwrap();
    assert_eq!(tree.len(), 2);
    assert!(tree.iter().filter_map(Value::as_str).all(|e| !e.trim_end_matches('/').contains('/')));
}

#[test]
fn test_collect_warns_once_per_degraded_endpoint() {
    require_git!();
    let fixture = TestFixture::new();
    widgets(&fixture);

    fixture
        .command()
        .args(["collect", "https://github.com/acme/widgets"])
        .assert()
        .success()
        .stderr(predicate::str::contains("WARN"))
        .stderr(predicate::str::contains("127.0.0.1"));
}
