// Line editor boundary
//
// The REPL only needs "give me the next chunk of input". `RustylineReader`
// is the interactive implementation; tests drive the loop with scripted
// readers.

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::helper::QueryHelper;

/// Result of one read from the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Text accepted by the editor (may span several lines)
    Line(String),
    /// Ctrl-C at the prompt: drop the current buffer
    Interrupted,
    /// Ctrl-D or closed input
    Eof,
}

pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome>;

    /// Record a submitted statement in history.
    fn add_history(&mut self, entry: &str);
}

pub struct RustylineReader {
    editor: Editor<QueryHelper, DefaultHistory>,
    history_file: Option<PathBuf>,
}

impl RustylineReader {
    pub fn new(color: bool, history_file: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = Config::builder().auto_add_history(false).build();
        let mut editor = Editor::with_config(config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize line editor: {}", e))?;
        editor.set_helper(Some(QueryHelper::new(color)));

        if let Some(path) = &history_file {
            if let Err(e) = editor.load_history(path) {
                debug!(path = %path.display(), "No history loaded: {}", e);
            }
        }

        Ok(Self {
            editor,
            history_file,
        })
    }
}

impl LineReader for RustylineReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
        }
    }

    fn add_history(&mut self, entry: &str) {
        if let Err(e) = self.editor.add_history_entry(entry) {
            warn!("Failed to add history entry: {}", e);
            return;
        }

        if let Some(path) = &self.history_file {
            if let Err(e) = self.editor.append_history(path) {
                warn!(path = %path.display(), "Failed to write history: {}", e);
            }
        }
    }
}
