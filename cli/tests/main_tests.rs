//! # Questsmith CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! Top-level behaviour of the binary: help, version, and argument errors.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let dir = sandbox();
    questsmith_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn test_version_flag() {
    let dir = sandbox();
    questsmith_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_fails() {
    let dir = sandbox();
    questsmith_cmd(dir.path())
        .arg("conjure")
        .assert()
        .failure()
        .stderr(predicate::str::contains("conjure"));
}
