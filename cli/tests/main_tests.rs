//! # Pack CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! Top-level behavior of the `pack` binary: `--help`, `--version` and
//! argument errors.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_help_flag_lists_formats() {
    pack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Supported formats:"))
        .stdout(predicate::str::contains("tar.gz / tgz / gz"))
        .stdout(predicate::str::contains("--dry"));
}

#[test]
fn test_version_flag() {
    pack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_flag_exits_with_one() {
    pack_cmd()
        .arg("--bogus")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn test_second_source_is_rejected() {
    pack_cmd().args(["a", "b"]).assert().code(1);
}
