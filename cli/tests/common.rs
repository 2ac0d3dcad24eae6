//! # Questsmith CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Every command is
//! run inside an isolated temporary directory with `HOME` and
//! `XDG_CONFIG_HOME` pointing into it, so no user or project configuration
//! and no stray `dataset.json` can influence the results. The model token
//! variable is removed as well, so generation never leaves the machine.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

pub const DRAGON_QUEST: &str =
    "Slay the ancient dragon Vrothgar, who guards the cursed hoard in the Emberfall Peaks.";
pub const FOREST_QUEST: &str =
    "Venture into the Whispering Woods to find the lost druid stone before the moon wanes.";

/// A scratch working directory that doubles as `$HOME`.
pub fn sandbox() -> TempDir {
    tempfile::tempdir().expect("Failed to create sandbox directory")
}

/// `questsmith` running inside `sandbox`.
pub fn questsmith_cmd(sandbox: &Path) -> Command {
    let mut cmd = Command::cargo_bin("questsmith").expect("Failed to find questsmith binary for testing");
    cmd.current_dir(sandbox)
        .env("HOME", sandbox)
        .env("XDG_CONFIG_HOME", sandbox.join(".config"))
        .env_remove("HUGGINGFACE_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}
