//! CLI binary smoke tests using assert_cmd.
//!
//! These run the compiled `predikt` binary against the demo iris forest to
//! check argument handling, startup failures, and one-shot predictions.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("predikt").unwrap()
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn demo_forest() -> String {
    workspace_root()
        .join("demos/iris_forest.json")
        .to_string_lossy()
        .into_owned()
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("predict"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("predikt"));
}

// ---------------------------------------------------------------------------
// predict
// ---------------------------------------------------------------------------

#[test]
fn predict_setosa() {
    cmd()
        .args(["predict", "--model", &demo_forest(), "--features", "5.1,3.5,1.4,0.2"])
        .assert()
        .success()
        .stdout(predicate::str::diff("{\"prediction\":0}\n"));
}

#[test]
fn predict_with_config_file() {
    cmd()
        .current_dir(workspace_root())
        .args(["predict", "demos/serve.json", "--features", "6.7,3.0,5.2,2.3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("{\"prediction\":2}"));
}

#[test]
fn predict_wrong_length_fails() {
    cmd()
        .args(["predict", "--model", &demo_forest(), "--features", "5.1,3.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected 4 features, got 2"));
}

#[test]
fn predict_non_numeric_feature_fails() {
    cmd()
        .args(["predict", "--model", &demo_forest(), "--features", "5.1,wide,1.4,0.2"])
        .assert()
        .failure();
}

#[test]
fn predict_missing_model_fails() {
    cmd()
        .args(["predict", "--model", "/nonexistent/model.json", "--features", "1,2,3,4"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn predict_mismatched_declared_features_fails() {
    cmd()
        .args([
            "predict",
            "--model",
            &demo_forest(),
            "--n-features",
            "7",
            "--features",
            "1,2,3,4,5,6,7",
        ])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn predict_corrupt_model_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, "not a model").unwrap();
    cmd()
        .args(["predict", "--model", path.to_str().unwrap(), "--features", "1,2,3,4"])
        .assert()
        .failure()
        .code(1);
}

// ---------------------------------------------------------------------------
// inspect / serve
// ---------------------------------------------------------------------------

#[test]
fn inspect_prints_metadata() {
    cmd()
        .args(["inspect", "--model", &demo_forest()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"n_features\": 4"))
        .stdout(predicate::str::contains("\"random_forest\""));
}

#[test]
fn serve_without_artifact_exits_before_binding() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .current_dir(dir.path())
        .args(["serve", "--port", "0"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .code(1);
}

#[test]
fn serve_with_unreadable_config_fails() {
    cmd()
        .args(["serve", "/nonexistent/serve.json"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure();
}

#[test]
fn unknown_format_is_rejected_by_parser() {
    cmd()
        .args(["inspect", "--model", &demo_forest(), "--format", "pickle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pickle"));
}
