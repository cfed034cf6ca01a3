//! # Pack Command Handler
//!
//! File: cli/src/commands/pack.rs
//!
//! ## Overview
//!
//! This module is the dispatcher behind the `pack` command line. Given a source
//! and a format it:
//!
//! 1. Resolves the effective settings (flags, environment, configuration).
//! 2. In verbose mode, reports the settings and which archivers are available.
//! 3. Validates the request, collecting every problem into one `ErrorBatch`
//!    so the user sees all of them at once. Nothing runs if any are found.
//! 4. Asks the selected archiver to build a `Pipeline`.
//! 5. Previews the pipeline (verbose or dry) and runs it.
//! 6. Optionally removes the source once the archive has been written.
//!
//! ## Error Handling
//!
//! - Validation problems -> `PackError::Validation` with every message.
//! - Archiver refusals -> `PackError::Build` (e.g. the target already exists).
//! - A stage that cannot be launched because the tool is not installed is
//!   reported as a missing dependency, distinct from a tool that ran and failed.
//! - A stage exiting non-zero -> `PackError::PipelineFailed`.
//!
//! Dry runs are not failures: nothing is executed and the command succeeds.
//!
use crate::archivers::{Archiver, BuildRequest, Registry};
use crate::common::process::{CommandSpec, Pipeline, RunStatus};
use crate::core::config::Config;
use crate::core::error::{ErrorBatch, PackError, Result};
use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::Path;
use tracing::{error, info};

/// Arguments of the `pack` command line (besides `-v`, which is global).
#[derive(Parser, Debug, Default, Clone)]
pub struct PackArgs {
    /// Print the underlying command and exit without running it.
    #[arg(short = 'n', long)]
    pub dry: bool,

    /// Remove the source file/dir after it has been packed.
    #[arg(short, long)]
    pub delete: bool,

    /// Archive format [default: tar, or `defaults.format` from the config].
    #[arg(
        short,
        long = "format",
        visible_alias = "fmt",
        env = "PACK_FORMAT",
        value_name = "FMT"
    )]
    pub format: Option<String>,

    /// Source file or directory to pack.
    #[arg(value_name = "SOURCE")]
    pub source: Option<String>,
}

/// Effective settings after merging flags with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub verbose: bool,
    pub dry: bool,
    pub delete: bool,
    /// Format token without leading dots.
    pub format: String,
    /// Source without trailing slashes.
    pub source: Option<String>,
}

impl Settings {
    pub fn resolve(args: PackArgs, verbose: u8, config: &Config) -> Self {
        let format = args
            .format
            .unwrap_or_else(|| config.defaults.format.clone());
        Self {
            verbose: verbose > 0,
            dry: args.dry,
            delete: args.delete || config.defaults.delete_source,
            format: format.trim_start_matches('.').to_string(),
            source: args
                .source
                .filter(|s| !s.is_empty())
                .map(|s| normalize_source(&s)),
        }
    }
}

/// Strips trailing slashes so `dir/` becomes `dir` (but `/` stays `/`).
fn normalize_source(source: &str) -> String {
    let trimmed = source.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Main handler: validate, build, preview, run, clean up.
pub fn handle_pack(settings: &Settings, registry: &Registry) -> Result<()> {
    if settings.verbose {
        report_settings(settings, registry);
    }

    let (archiver, source) = validate(settings, registry)?;

    let request = BuildRequest::new(source, &settings.format, settings.dry);
    let pipeline = archiver.build(&request).map_err(PackError::from)?;
    if settings.verbose || pipeline.is_dry() {
        pipeline.print_preview();
    }

    let status = execute(&pipeline)?;
    match status {
        RunStatus::Succeeded => info!("res = true"),
        RunStatus::DryRun => info!("res = not executed (dry run)"),
        RunStatus::Failed => error!("res = false"),
    }

    if settings.delete && status != RunStatus::Failed {
        remove_source(source, settings)?;
    }

    if status == RunStatus::Failed {
        return Err(PackError::PipelineFailed.into());
    }
    Ok(())
}

/// Checks the request before anything is built or spawned.
///
/// Every problem found is collected; the returned error lists all of them.
fn validate<'r, 's>(
    settings: &'s Settings,
    registry: &'r Registry,
) -> std::result::Result<(&'r dyn Archiver, &'s str), PackError> {
    let mut errors = ErrorBatch::new();

    let archiver = registry.lookup(&settings.format);
    let usable = match archiver {
        None => {
            errors.push(format!("Unsupported format: [{}]", settings.format));
            None
        }
        Some(archiver) => {
            let missing = archiver.missing_utilities();
            if missing.is_empty() {
                Some(archiver)
            } else {
                errors.push(format!(
                    "Unsupported format: [{}] (need {})",
                    settings.format,
                    missing.join(", ")
                ));
                None
            }
        }
    };

    let source = settings.source.as_deref();
    match source {
        None => errors.push("Need to provide source file/directory"),
        Some(path) => {
            let path_ref = Path::new(path);
            if !path_ref.exists() {
                errors.push(format!("Source file [{}] does not exist", path));
            } else if !path_ref.is_file() && !path_ref.is_dir() {
                errors.push("Source file is neither a file nor a dir");
            } else if let Some(archiver) = archiver {
                let already_packed = archiver
                    .formats()
                    .iter()
                    .any(|ext| path.ends_with(&format!(".{}", ext)));
                if already_packed {
                    errors.push("Nothing to do");
                }
            }
        }
    }

    errors.into_result()?;
    match (usable, source) {
        (Some(archiver), Some(source)) => Ok((archiver, source)),
        _ => unreachable!("a missing archiver or source is always recorded as an error"),
    }
}

/// Runs the pipeline, turning a missing tool into a dependency message.
fn execute(pipeline: &Pipeline) -> Result<RunStatus> {
    match pipeline.run() {
        Ok(status) => Ok(status),
        Err(e) if e.is_missing_program() => {
            let program = e.program().unwrap_or_default().to_string();
            Err(anyhow::Error::new(PackError::Exec(e))
                .context(format!("Missing dependency: '{}' is not installed", program)))
        }
        Err(e) => Err(PackError::Exec(e).into()),
    }
}

/// `rm [-r] <source>`, previewed and executed like any other pipeline.
fn remove_source(source: &str, settings: &Settings) -> Result<()> {
    let mut tokens = vec!["rm"];
    if Path::new(source).is_dir() {
        tokens.push("-r");
    }
    tokens.push(source);

    let pipeline = Pipeline::single(
        CommandSpec::new(tokens).map_err(PackError::from)?,
        settings.dry,
    );
    if settings.verbose || pipeline.is_dry() {
        pipeline.print_preview();
    }
    match execute(&pipeline).context("Failed to remove source")? {
        RunStatus::Failed => Err(anyhow!("Failed to remove source [{}]", source)),
        RunStatus::Succeeded | RunStatus::DryRun => Ok(()),
    }
}

/// Verbose report of the effective settings and archiver availability.
fn report_settings(settings: &Settings, registry: &Registry) {
    info!("[args] verbose = {}", settings.verbose);
    info!("[args] dry = {}", settings.dry);
    info!("[args] delete = {}", settings.delete);
    info!("[args] format = [{}]", settings.format);
    info!(
        "[args] source = [{}]",
        settings.source.as_deref().unwrap_or_default()
    );
    for archiver in registry.iter() {
        let missing = archiver.missing_utilities();
        let why = if missing.is_empty() {
            String::new()
        } else {
            format!(" (need {})", missing.join(", "))
        };
        info!(
            "[status] {}.available = {}{}",
            archiver.name(),
            missing.is_empty(),
            why
        );
    }
}
