// Configuration structs

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::constants::*;

/// Where and how to reach the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Base URL of the server, e.g. "http://127.0.0.1:5656"
    pub url: String,
    pub database: String,
    pub connect_timeout_secs: u64,
    /// Timeout for a single statement
    pub request_timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Interactive console behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Syntax highlighting in the editor
    pub color: bool,
    /// Override for the history file location
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            color: true,
            history_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub repl: ReplConfig,
}

impl Config {
    /// Reject values that would only fail later, at connect time.
    pub fn validate(&self) -> Result<()> {
        let url = self.connection.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!(
                "connection.url must start with http:// or https:// (got {:?})",
                self.connection.url
            );
        }
        if self.connection.database.trim().is_empty() {
            bail!("connection.database must not be empty");
        }
        if self.connection.connect_timeout_secs == 0 {
            bail!("connection.connect_timeout_secs must be greater than zero");
        }
        if self.connection.request_timeout_secs == 0 {
            bail!("connection.request_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}
