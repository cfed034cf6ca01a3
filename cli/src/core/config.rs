//! # Pack Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the optional configuration files for `pack`. Configuration
//! only supplies defaults; every value can be overridden on the command line.
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags (and `PACK_FORMAT` for the format)
//! 2. Project-specific `.pack.toml` in the current directory or an ancestor
//!    (the search stops at a directory containing `.git`)
//! 3. User-specific `<config dir>/pack/config.toml`
//! 4. Default values defined in the code
//!
//! ## Examples
//!
//! ```toml
//! [defaults]
//! format = "tar.gz"
//! delete_source = false
//! ```
//!
use crate::core::error::{PackError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Effective configuration after every file layer has been applied.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub defaults: Defaults,
}

/// Default values for command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Archive format used when `-f` is not given.
    pub format: String,
    /// Remove the source after a successful archive, as if `-d` were given.
    pub delete_source: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            format: default_format(),
            delete_source: false,
        }
    }
}

/// One configuration file as written on disk. Keys left out of the file
/// stay `None` and leave the value from a lower layer in place.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsFile,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct DefaultsFile {
    format: Option<String>,
    delete_source: Option<bool>,
}

impl ConfigFile {
    fn apply_to(self, config: &mut Config) {
        if let Some(format) = self.defaults.format {
            config.defaults.format = format;
        }
        if let Some(delete_source) = self.defaults.delete_source {
            config.defaults.delete_source = delete_source;
        }
    }
}

fn default_format() -> String {
    "tar".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".pack.toml";

/// Loads, merges and validates the user and project configuration.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let project_config = match find_project_config_path(&current_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            Some(load_config_from_path(&path)?)
        }
        None => {
            debug!("No project configuration file ({PROJECT_CONFIG_FILENAME}) found.");
            None
        }
    };
    let merged = merge_configs(user_config, project_config);
    validate_config(&merged).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged);
    Ok(merged)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    let Some(proj_dirs) = ProjectDirs::from("", "", "pack") else {
        warn!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.is_file() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Applies the user layer, then the project layer, over the built-in defaults.
fn merge_configs(user: Option<ConfigFile>, project: Option<ConfigFile>) -> Config {
    let mut merged = Config::default();
    for layer in [user, project].into_iter().flatten() {
        layer.apply_to(&mut merged);
    }
    merged
}

fn validate_config(config: &Config) -> Result<()> {
    if config.defaults.format.trim_start_matches('.').is_empty() {
        return Err(anyhow!(PackError::Config(
            "defaults.format must name an archive format".to_string()
        )));
    }
    Ok(())
}
