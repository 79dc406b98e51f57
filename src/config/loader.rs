// Configuration loader
// Loads settings from ~/.quill/config.toml, then applies environment overrides

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::constants::*;
use super::settings::Config;

/// Load configuration.
///
/// An explicit path must exist. Without one, `~/.quill/config.toml` is used
/// when present and built-in defaults otherwise. Environment variables
/// (`QUILL_URL`, `QUILL_DATABASE`) override file values. The result is not
/// validated yet: command-line flags may still change it.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("Configuration file not found: {}", path.display());
            }
            load_from_path(path)?
        }
        None => match default_config_path() {
            Some(path) if path.exists() => load_from_path(&path)?,
            _ => {
                debug!("No configuration file, using defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Parse a TOML configuration file. Missing sections and keys take defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

    debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// `~/.quill/config.toml`, if the home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Apply environment overrides using `lookup` to read variables. Empty values
/// are ignored.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(url) = non_empty(ENV_URL) {
        config.connection.url = url;
    }
    if let Some(database) = non_empty(ENV_DATABASE) {
        config.connection.database = database;
    }
}
