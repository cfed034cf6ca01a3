//! # Pack Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by the rest of the application:
//! - `config`: loading and merging the optional TOML configuration
//! - `error`: the error taxonomy and the validation error accumulator
//!
pub mod config;
pub mod error;
