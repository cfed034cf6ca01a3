//! # System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Host-system inspection. Currently this is the `tools` submodule, which
//! checks whether the external utilities an archiver needs are installed.
//!
//! ```rust
//! use crate::common::system::tools;
//!
//! if !tools::is_available("xz") {
//!     println!("xz archives are not available");
//! }
//! ```
//!
pub mod tools;
