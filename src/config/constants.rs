// Project-wide constants
//
// Centralised here so default endpoints and file names have one source of
// truth. Import via `use crate::config::constants::*;`.

/// Default server address (the database's HTTP port).
pub const DEFAULT_URL: &str = "http://127.0.0.1:5656";

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "edgedb";

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Upper bound for a single statement round trip.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Directory under `$HOME` holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = ".quill";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// History file under `$HOME`.
pub const HISTORY_FILE_NAME: &str = ".quill_history";

pub const PRIMARY_PROMPT: &str = ">>> ";

/// Shown while a statement spans several lines.
pub const CONTINUATION_PROMPT: &str = "... ";

// Environment overrides
pub const ENV_URL: &str = "QUILL_URL";
pub const ENV_DATABASE: &str = "QUILL_DATABASE";
pub const ENV_HISTORY: &str = "QUILL_HISTORY";
pub const ENV_LOG: &str = "QUILL_LOG";
