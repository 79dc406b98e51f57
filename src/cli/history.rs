// History file location
//
// By default history lives in `~/.quill_history`. The location can be set in
// the config file (`repl.history_file`) or with `QUILL_HISTORY`; an empty
// `QUILL_HISTORY` disables persistence. rustyline owns the file format.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::constants::{ENV_HISTORY, HISTORY_FILE_NAME};

/// Resolve the history file: environment, then config, then home directory.
pub fn history_path(configured: Option<&Path>) -> Option<PathBuf> {
    resolve_history_path(env::var(ENV_HISTORY).ok(), configured, dirs::home_dir())
}

fn resolve_history_path(
    from_env: Option<String>,
    configured: Option<&Path>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(custom) = from_env {
        if custom.is_empty() {
            return None;
        }
        return Some(PathBuf::from(custom));
    }

    if let Some(path) = configured {
        return Some(path.to_path_buf());
    }

    home.map(|home| home.join(HISTORY_FILE_NAME))
}
