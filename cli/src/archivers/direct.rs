//! # Direct Archivers (`archivers::direct`)
//!
//! File: cli/src/archivers/direct.rs
//!
//! Archivers whose tool takes the target and source on its command line and
//! writes the archive itself. The pipeline is a single stage:
//!
//! ```text
//! $ <command...> <source>.<format> <source>
//! ```
//!
use super::{ensure_handles, ensure_target_absent, target_path, Archiver, BuildRequest};
use crate::common::process::{CommandSpec, Pipeline};
use crate::core::error::BuildError;
use tracing::debug;

/// A single-stage archiver: `command` followed by the target and the source.
#[derive(Debug, Clone, Copy)]
pub struct DirectArchiver {
    name: &'static str,
    formats: &'static [&'static str],
    utilities: &'static [&'static str],
    command: &'static [&'static str],
}

pub const TAR: DirectArchiver = DirectArchiver {
    name: "tar",
    formats: &["tar"],
    utilities: &["tar"],
    command: &["tar", "cvf"],
};

pub const BZIP2: DirectArchiver = DirectArchiver {
    name: "bzip2",
    formats: &["tar.bz", "tbz", "tar.bz2", "tbz2", "bz", "bz2"],
    utilities: &["tar"],
    command: &["tar", "jcvf"],
};

pub const GZIP: DirectArchiver = DirectArchiver {
    name: "gzip",
    formats: &["tar.gz", "tgz", "gz"],
    utilities: &["tar"],
    command: &["tar", "zcvf"],
};

pub const ZIP: DirectArchiver = DirectArchiver {
    name: "zip",
    formats: &["zip"],
    utilities: &["zip"],
    command: &["zip", "-r"],
};

pub const SEVEN_ZIP: DirectArchiver = DirectArchiver {
    name: "7z",
    formats: &["7z"],
    utilities: &["7z"],
    command: &["7z", "a"],
};

impl Archiver for DirectArchiver {
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
        let target = target_path(request.source, request.format);
        ensure_target_absent(&target)?;

        let tokens = self
            .command
            .iter()
            .map(|token| token.to_string())
            .chain([target, request.source.to_string()]);
        let stage = CommandSpec::new(tokens)?;
        debug!("[{}] Built single-stage pipeline: {}", self.name, stage.render());
        Ok(Pipeline::single(stage, request.dry))
    }
}
