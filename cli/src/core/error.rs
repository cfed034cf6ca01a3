//! # Pack Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy used throughout `pack`. Errors are
//! split by the phase in which they can occur, so the dispatcher can react to
//! each one differently:
//!
//! - `ConstructionError`: a malformed pipeline description. This is always a
//!   defect in an archiver definition, never something the user caused.
//! - `BuildError`: an archiver declines a request (directory given to a
//!   single-file format, target already exists, unexpected format token).
//! - `ExecError`: a stage could not be launched or waited on, or a redirect
//!   file could not be opened.
//! - `PackError`: the top-level error carried through `anyhow` to `main`.
//!
//! Validation problems are not returned one at a time. They are collected in
//! an `ErrorBatch` and surfaced together as `PackError::Validation`.
//!
//! ## Examples
//!
//! ```rust
//! let mut errors = ErrorBatch::new();
//! if source.is_none() {
//!     errors.push("Need to provide source file/directory");
//! }
//! errors.into_result()?; // Fails with every collected message at once.
//! ```
//!
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A pipeline description that violates the stage/redirect layout rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("Pipeline must contain at least one element")]
    EmptyPipeline,

    #[error("Pipeline must contain at least one command stage")]
    NoStages,

    #[error("Command stage must contain at least one token")]
    EmptyCommand,

    #[error("Command stage has an empty program name")]
    EmptyProgram,

    #[error("Redirect at position {position} is neither the first nor the last element")]
    MisplacedRedirect { position: usize },
}

/// An archiver refusing to build a pipeline for a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("[{archiver}] Format {format} does not support directory")]
    DirectoryUnsupported {
        archiver: &'static str,
        format: String,
    },

    #[error("File already exists: [{}]", path.display())]
    TargetExists { path: PathBuf },

    #[error("[{archiver}] Unexpected fmt: {format}")]
    UnexpectedFormat {
        archiver: &'static str,
        format: String,
    },

    /// The archiver produced a malformed pipeline; a defect, not a user error.
    #[error("Invalid pipeline definition: {0}")]
    InvalidDefinition(#[from] ConstructionError),
}

/// Failures of the pipeline machinery itself, as opposed to a stage that ran
/// and exited non-zero.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Failed to launch stage {stage} ('{program}'): {source}")]
    Spawn {
        stage: usize,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open redirect file '{}': {source}", path.display())]
    RedirectOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to wait for stage {stage} ('{program}'): {source}")]
    Wait {
        stage: usize,
        program: String,
        #[source]
        source: io::Error,
    },
}

impl ExecError {
    /// True when a stage could not start because its program is not installed.
    pub fn is_missing_program(&self) -> bool {
        matches!(self, ExecError::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    /// The program of the failing stage, if the error is tied to one.
    pub fn program(&self) -> Option<&str> {
        match self {
            ExecError::Spawn { program, .. } | ExecError::Wait { program, .. } => {
                Some(program.as_str())
            }
            ExecError::RedirectOpen { .. } => None,
        }
    }
}

/// Top-level error type for the `pack` application.
#[derive(Error, Debug)]
pub enum PackError {
    #[error("Invalid pipeline definition: {0}")]
    Construction(#[from] ConstructionError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Exec(#[from] ExecError),

    #[error("{0}")]
    Validation(ErrorBatch),

    #[error("Pipeline reported failure")]
    PipelineFailed,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Accumulates validation messages so they can be reported as one batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorBatch {
    messages: Vec<String>,
}

impl ErrorBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// `Ok(())` when nothing was collected, otherwise every message as a
    /// single `PackError::Validation`.
    pub fn into_result(self) -> std::result::Result<(), PackError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PackError::Validation(self))
        }
    }
}

impl fmt::Display for ErrorBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", message)?;
        }
        Ok(())
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let misplaced = ConstructionError::MisplacedRedirect { position: 1 };
        assert_eq!(
            misplaced.to_string(),
            "Redirect at position 1 is neither the first nor the last element"
        );

        let exists = BuildError::TargetExists {
            path: PathBuf::from("notes.txt.Z"),
        };
        assert_eq!(exists.to_string(), "File already exists: [notes.txt.Z]");

        let dir = BuildError::DirectoryUnsupported {
            archiver: "compress",
            format: "Z".into(),
        };
        assert_eq!(
            dir.to_string(),
            "[compress] Format Z does not support directory"
        );
    }

    #[test]
    fn test_missing_program_detection() {
        let missing = ExecError::Spawn {
            stage: 0,
            program: "no-such-tool".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(missing.is_missing_program());
        assert_eq!(missing.program(), Some("no-such-tool"));

        let denied = ExecError::Spawn {
            stage: 1,
            program: "tool".into(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(!denied.is_missing_program());
    }

    #[test]
    fn test_error_batch_collects_all_messages() {
        let mut batch = ErrorBatch::new();
        assert!(batch.clone().into_result().is_ok());

        batch.push("first");
        batch.push(String::from("second"));
        assert_eq!(batch.iter().count(), 2);
        assert_eq!(batch.to_string(), "first\nsecond");

        match batch.into_result() {
            Err(PackError::Validation(errors)) => {
                assert_eq!(errors.iter().collect::<Vec<_>>(), vec!["first", "second"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
