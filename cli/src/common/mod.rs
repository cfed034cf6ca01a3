//! # Pack Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks that are independent of any particular archive
//! format:
//!
//! - **`process`**: `CommandSpec` and `Pipeline`, the engine that spawns and
//!   wires external processes, previews them and aggregates their results.
//! - **`system`**: host inspection, i.e. whether a required tool is installed.
//!
//! Format-specific knowledge lives in `crate::archivers`, which builds on these.
//!

/// Spawning and wiring external processes into pipelines.
pub mod process;
/// Host-system checks such as tool availability.
pub mod system;
