//! # Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process/mod.rs
//!
//! ## Overview
//!
//! Everything `pack` knows about running external programs lives here:
//!
//! - **`command`**: `CommandSpec`, one program invocation as an argument vector.
//! - **`pipeline`**: `Pipeline`, a chain of `CommandSpec` stages connected by
//!   pipes, with optional file `Redirect`s at either end, a dry-run preview,
//!   and aggregate success across all stages.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::process::{CommandSpec, Pipeline, Redirect};
//!
//! let pipeline = Pipeline::new(
//!     vec![
//!         CommandSpec::new(["tar", "cvf", "-", "src"])?.into(),
//!         CommandSpec::new(["xz", "-"])?.into(),
//!         Redirect::new("src.tar.xz").into(),
//!     ],
//!     false,
//! )?;
//! pipeline.print_preview(); // $ tar cvf - src | xz - > src.tar.xz
//! let status = pipeline.run()?;
//! ```
//!
pub mod command;
pub mod pipeline;

pub use command::CommandSpec;
pub use pipeline::{Element, Pipeline, Redirect, RunStatus};
