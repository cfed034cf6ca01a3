//! # Pack Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! `pack` archives a file or directory by driving the archiving tools already
//! installed on the system (`tar`, `xz`, `compress`, `zip`, ...). This file:
//! - parses the command line with Clap (the help text lists every format and
//!   whether its tools are installed)
//! - sets up logging to stderr based on the verbosity flags
//! - loads the optional configuration and hands off to the dispatcher
//! - prints errors and maps them to exit status 1
//!
//! ## Examples
//!
//! ```bash
//! # Pack a directory into my_dir.tar and remove the directory afterwards
//! pack -d -f tar my_dir
//!
//! # Show what would run, without running it
//! pack -n -f tar.xz my_dir
//! ```
//!
use clap::{CommandFactory, FromArgMatches, Parser};
use std::io::IsTerminal;
use tracing_subscriber::{fmt, EnvFilter};

mod archivers; // Format-specific pipeline builders and the format registry
mod commands; // The dispatcher behind the command line
mod common; // Process pipelines and system checks
mod core; // Errors and configuration

use crate::archivers::Registry;
use crate::core::error::{PackError, Result};

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "pack",
    about = "Pack a file or directory into an archive using the installed archiving tools",
    version
)]
struct Cli {
    /// Verbose: report arguments, tool availability and the command line.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    pack: commands::pack::PackArgs,
}

fn main() -> anyhow::Result<()> {
    let registry = Registry::builtin();
    let command = Cli::command().after_help(format!(
        "Supported formats:\n{}\n\nExample:\n  $ pack -d -f tar my_dir",
        registry.formats_help()
    ));

    let cli = match command
        .try_get_matches()
        .and_then(|matches| Cli::from_arg_matches(&matches))
    {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --version are not errors.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli, &registry) {
        tracing::debug!("Command execution failed: {:?}", e);
        report_error(&e);
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: Cli, registry: &Registry) -> Result<()> {
    let config = crate::core::config::load_config()?;
    let settings = commands::pack::Settings::resolve(cli.pack, cli.verbose, &config);
    commands::pack::handle_pack(&settings, registry)
}

/// Validation errors are printed one per line; anything else as a single error.
fn report_error(e: &anyhow::Error) {
    match e.downcast_ref::<PackError>() {
        Some(PackError::Validation(errors)) => {
            for message in errors.iter() {
                eprintln!("Error: {}", message);
            }
        }
        _ => eprintln!("Error: {}", e),
    }
}
