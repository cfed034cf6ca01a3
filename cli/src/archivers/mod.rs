//! # Archivers (`archivers`)
//!
//! File: cli/src/archivers/mod.rs
//!
//! ## Overview
//!
//! An archiver maps a requested format onto a `Pipeline` of external tools.
//! Each archiver is a value implementing the `Archiver` capability trait:
//!
//! - `formats()`: the format tokens / extensions it handles (`tar.gz`, `tgz`, ...)
//! - `utilities()`: the external programs its pipelines need
//! - `build(request)`: a ready-to-run `Pipeline`, or a `BuildError`
//!
//! The `Registry` is the dispatch table keyed by format token. It never builds
//! anything itself; it only finds the archiver responsible for a format.
//!
//! ## Architecture
//!
//! - **`direct`**: archivers whose tool writes the archive itself
//!   (`tar cvf T S`, `zip -r T S`, `7z a T S`).
//! - **`stream`**: archivers built around a stream compressor (`compress`,
//!   `xz`) that read from stdin and write to stdout, fed either by the source
//!   file or by `tar cvf - S`.
//!
//! All targets are named `<source>.<suffix>` and an existing target is always
//! refused, so an archive is never overwritten.
//!
use crate::common::process::Pipeline;
use crate::common::system::tools;
use crate::core::error::BuildError;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub mod direct;
pub mod stream;

/// Everything an archiver needs to build a pipeline.
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    /// Source file or directory, as it will appear in the command line.
    pub source: &'a str,
    /// Requested format token, without a leading dot.
    pub format: &'a str,
    /// Whether the resulting pipeline is preview-only.
    pub dry: bool,
}

impl<'a> BuildRequest<'a> {
    pub fn new(source: &'a str, format: &'a str, dry: bool) -> Self {
        Self {
            source,
            format,
            dry,
        }
    }

    pub fn source_is_dir(&self) -> bool {
        Path::new(self.source).is_dir()
    }
}

/// The capability every archiver provides to the dispatcher.
pub trait Archiver: Send + Sync {
    /// Short identifier used in logs and messages.
    fn name(&self) -> &'static str;

    fn formats(&self) -> &'static [&'static str];

    fn utilities(&self) -> &'static [&'static str];

    /// Builds the pipeline for `request`, or explains why it cannot.
    fn build(&self, request: &BuildRequest<'_>) -> Result<Pipeline, BuildError>;

    fn handles(&self, format: &str) -> bool {
        self.formats().iter().any(|known| *known == format)
    }

    /// Required utilities that are not installed.
    fn missing_utilities(&self) -> Vec<&'static str> {
        tools::missing(self.utilities())
    }
}

impl fmt::Debug for dyn Archiver + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archiver")
            .field("name", &self.name())
            .field("formats", &self.formats())
            .finish()
    }
}

/// `<source>.<suffix>`
pub fn target_path(source: &str, suffix: &str) -> String {
    format!("{}.{}", source, suffix)
}

/// Refuses targets that already exist, including dangling symlinks.
pub fn ensure_target_absent(target: &str) -> Result<(), BuildError> {
    if Path::new(target).symlink_metadata().is_ok() {
        return Err(BuildError::TargetExists {
            path: target.into(),
        });
    }
    Ok(())
}

fn ensure_handles(archiver: &dyn Archiver, format: &str) -> Result<(), BuildError> {
    if archiver.handles(format) {
        Ok(())
    } else {
        Err(BuildError::UnexpectedFormat {
            archiver: archiver.name(),
            format: format.to_string(),
        })
    }
}

/// Format-keyed dispatch table over the available archivers.
pub struct Registry {
    archivers: Vec<Box<dyn Archiver>>,
    by_format: BTreeMap<&'static str, usize>,
}

impl Registry {
    /// Builds a registry; the first archiver to claim a format wins.
    pub fn new(archivers: Vec<Box<dyn Archiver>>) -> Self {
        let mut by_format = BTreeMap::new();
        for (index, archiver) in archivers.iter().enumerate() {
            for format in archiver.formats() {
                by_format.entry(*format).or_insert(index);
            }
        }
        Self {
            archivers,
            by_format,
        }
    }

    /// Every archiver `pack` ships with.
    pub fn builtin() -> Self {
        Self::new(vec![
            Box::new(direct::TAR),
            Box::new(direct::BZIP2),
            Box::new(direct::GZIP),
            Box::new(stream::COMPRESS),
            Box::new(stream::XZ),
            Box::new(direct::ZIP),
            Box::new(direct::SEVEN_ZIP),
        ])
    }

    pub fn lookup(&self, format: &str) -> Option<&dyn Archiver> {
        self.by_format
            .get(format)
            .map(|&index| self.archivers[index].as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Archiver> {
        self.archivers.iter().map(|archiver| archiver.as_ref())
    }

    /// One line per archiver for the help text, noting missing utilities.
    pub fn formats_help(&self) -> String {
        self.iter()
            .map(|archiver| {
                let missing = archiver.missing_utilities();
                let mut line = format!("  {}", archiver.formats().join(" / "));
                if !missing.is_empty() {
                    line.push_str(&format!(" (not available: need {})", missing.join(", ")));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_lookup_by_format() {
        let registry = Registry::builtin();
        assert_eq!(registry.lookup("tar").unwrap().name(), "tar");
        assert_eq!(registry.lookup("tgz").unwrap().name(), "gzip");
        assert_eq!(registry.lookup("tar.bz2").unwrap().name(), "bzip2");
        assert_eq!(registry.lookup("Z").unwrap().name(), "compress");
        assert_eq!(registry.lookup("tar.xz").unwrap().name(), "xz");
        assert_eq!(registry.lookup("zip").unwrap().name(), "zip");
        assert_eq!(registry.lookup("7z").unwrap().name(), "7z");
        assert!(registry.lookup("rar").is_none());
        // Format tokens are case-sensitive: `Z` is compress, `z` is nothing.
        assert!(registry.lookup("z").is_none());
    }

    #[test]
    fn test_every_format_has_one_owner() {
        let registry = Registry::builtin();
        let mut seen = std::collections::HashSet::new();
        for archiver in registry.iter() {
            assert!(!archiver.utilities().is_empty());
            for format in archiver.formats() {
                assert!(seen.insert(*format), "format '{}' claimed twice", format);
                assert!(!format.starts_with('.'));
            }
        }
    }

    #[test]
    fn test_formats_help_lists_every_archiver() {
        let registry = Registry::builtin();
        let help = registry.formats_help();
        assert_eq!(help.lines().count(), registry.iter().count());
        assert!(help.contains("tar.gz / tgz / gz"));
    }

    #[test]
    fn test_existing_target_is_refused_by_every_archiver() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("notes.txt");
        fs::write(&source, "hello").unwrap();
        let source = source.to_str().unwrap();

        let registry = Registry::builtin();
        for archiver in registry.iter() {
            for format in archiver.formats() {
                let request = BuildRequest::new(source, format, false);
                let target = match archiver.build(&request) {
                    Ok(pipeline) => pipeline
                        .output()
                        .map(|r| r.path().to_str().unwrap().to_string())
                        .unwrap_or_else(|| target_path(source, format)),
                    Err(e) => panic!("{} / {}: unexpected {:?}", archiver.name(), format, e),
                };
                fs::write(&target, "").unwrap();
                assert_eq!(
                    archiver.build(&request),
                    Err(BuildError::TargetExists {
                        path: target.clone().into()
                    }),
                    "{} / {}",
                    archiver.name(),
                    format
                );
                fs::remove_file(&target).unwrap();
            }
        }
    }

    #[test]
    fn test_unhandled_format_is_rejected() {
        let registry = Registry::builtin();
        for archiver in registry.iter() {
            let request = BuildRequest::new("whatever", "rar", false);
            assert_eq!(
                archiver.build(&request),
                Err(BuildError::UnexpectedFormat {
                    archiver: archiver.name(),
                    format: "rar".into()
                })
            );
        }
    }

    #[test]
    fn test_archiver_debug_names_it() {
        let registry = Registry::builtin();
        let gzip = registry.lookup("tgz").unwrap();
        let rendered = format!("{:?}", gzip);
        assert!(rendered.contains("\"gzip\""));
        assert!(rendered.contains("\"tar.gz\""));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_counts_as_existing() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a.tar");
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &target).unwrap();
        assert!(ensure_target_absent(target.to_str().unwrap()).is_err());
    }
}
