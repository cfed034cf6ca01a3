//! # Pack CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test runs
//! the compiled `pack` binary inside its own scratch directory with the user
//! configuration location pointed into that directory, so a developer's real
//! `config.toml` or `PACK_FORMAT` never leaks into a test.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// # Get Pack Command (`pack_cmd`)
///
/// An `assert_cmd::Command` for the compiled `pack` binary.
///
/// ## Panics
/// Panics if the `pack` binary cannot be found via `Command::cargo_bin`.
pub fn pack_cmd() -> Command {
    Command::cargo_bin("pack").expect("Failed to find pack binary for testing")
}

/// # Pack Command In Directory (`pack_cmd_in`)
///
/// Like `pack_cmd`, but running in `dir` with an isolated environment.
pub fn pack_cmd_in(dir: &Path) -> Command {
    let mut cmd = pack_cmd();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("HOME", dir)
        .env_remove("PACK_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}
