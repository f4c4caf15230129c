//! CLI integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("gormgen")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tables"))
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("gormgen")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gormgen"));
}

#[test]
fn test_missing_connection_parameters_fail() {
    Command::cargo_bin("gormgen")
        .unwrap()
        .arg("tables")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required parameter"));
}

#[test]
fn test_unsupported_engine_fails() {
    Command::cargo_bin("gormgen")
        .unwrap()
        .args([
            "--engine",
            "oracle",
            "--host",
            "localhost",
            "--user",
            "u",
            "--database",
            "d",
            "tables",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported database engine"));
}
