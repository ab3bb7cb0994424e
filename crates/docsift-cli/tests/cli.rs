//! End-to-end CLI tests that run without network or OCR binaries.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("docsift")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn config_show_prints_defaults() {
    Command::cargo_bin("docsift")
        .unwrap()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complexity_threshold"))
        .stdout(predicate::str::contains("0.7"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docsift.json");

    Command::cargo_bin("docsift")
        .unwrap()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();

    Command::cargo_bin("docsift")
        .unwrap()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn process_rejects_missing_input() {
    Command::cargo_bin("docsift")
        .unwrap()
        .args(["process", "definitely-not-there.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
