//! # Pack Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Command handlers reachable from `main.rs`. `pack` has a single command, so
//! this holds one module: `pack`, which defines the command's arguments and
//! the dispatcher that validates a request, builds the archiver's pipeline and
//! runs it.
//!

/// The archiving dispatcher: `PackArgs`, `Settings` and `handle_pack`.
pub mod pack;
