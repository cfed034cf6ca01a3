//! # Stream Compressor Archivers (`archivers::stream`)
//!
//! File: cli/src/archivers/stream.rs
//!
//! ## Overview
//!
//! `compress` and `xz` only compress a byte stream. They are driven in one of
//! two shapes, depending on the requested format and the source:
//!
//! ```text
//! bare format (Z, xz), regular file:    cat S | compressor > S.Z
//! tar.X format, directory or file:      tar cvf - S | compressor > S.tar.Z
//! ```
//!
//! The bare formats do not accept directories. The target is always the
//! source plus the requested format, so `b.tar` packed as `tar.xz` becomes
//! `b.tar.tar.xz`; use the bare format to compress an existing tarball.
//!
use super::{ensure_handles, ensure_target_absent, target_path, Archiver, BuildRequest};
use crate::common::process::{CommandSpec, Element, Pipeline, Redirect};
use crate::core::error::BuildError;
use tracing::debug;

/// An archiver built around a stdin-to-stdout compressor.
#[derive(Debug, Clone, Copy)]
pub struct StreamArchiver {
    name: &'static str,
    /// Single-file format, e.g. `Z`.
    bare: &'static str,
    /// Tarball format, e.g. `tar.Z`.
    tarred: &'static str,
    formats: &'static [&'static str],
    utilities: &'static [&'static str],
    /// Compressor invocation when fed a file.
    file_stage: &'static [&'static str],
    /// Compressor invocation when fed by `tar`.
    pipe_stage: &'static [&'static str],
}

pub const COMPRESS: StreamArchiver = StreamArchiver {
    name: "compress",
    bare: "Z",
    tarred: "tar.Z",
    formats: &["tar.Z", "Z"],
    utilities: &["compress", "tar"],
    file_stage: &["compress", "-c", "-"],
    pipe_stage: &["compress", "-c", "-"],
};

pub const XZ: StreamArchiver = StreamArchiver {
    name: "xz",
    bare: "xz",
    tarred: "tar.xz",
    formats: &["tar.xz", "xz"],
    utilities: &["xz", "tar"],
    file_stage: &["xz", "--stdout"],
    pipe_stage: &["xz", "-"],
};

/// How the compressor is fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feed {
    File,
    Tar,
}

impl StreamArchiver {
    /// Chooses the feed and the target suffix for a request.
    fn plan(&self, request: &BuildRequest<'_>) -> Result<(Feed, &'static str), BuildError> {
        let is_dir = request.source_is_dir();
        if request.format == self.bare {
            if is_dir {
                return Err(BuildError::DirectoryUnsupported {
                    archiver: self.name,
                    format: request.format.to_string(),
                });
            }
            Ok((Feed::File, self.bare))
        } else if request.format == self.tarred {
            Ok((Feed::Tar, self.tarred))
        } else {
            Err(BuildError::UnexpectedFormat {
                archiver: self.name,
                format: request.format.to_string(),
            })
        }
    }
}

impl Archiver for StreamArchiver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn formats(&self) -> &'static [&'static str] {
        self.formats
    }

    fn utilities(&self) -> &'static [&'static str] {
        self.utilities
    }

    fn build(&self, request: &BuildRequest<'_>) -> Result<Pipeline, BuildError> {
        ensure_handles(self, request.format)?;
        let (feed, suffix) = self.plan(request)?;
        let target = target_path(request.source, suffix);
        ensure_target_absent(&target)?;
        debug!("[{}] {:?} feed, target {}", self.name, feed, target);

        let elements: Vec<Element> = match feed {
            Feed::File => vec![
                Redirect::new(request.source).into(),
                CommandSpec::new(self.file_stage.iter().copied())?.into(),
                Redirect::new(target).into(),
            ],
            Feed::Tar => vec![
                CommandSpec::new(["tar", "cvf", "-", request.source])?.into(),
                CommandSpec::new(self.pipe_stage.iter().copied())?.into(),
                Redirect::new(target).into(),
            ],
        };
        Ok(Pipeline::new(elements, request.dry)?)
    }
}
