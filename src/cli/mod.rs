// CLI module
// Public interface for the interactive console

pub mod classifier;
mod editor;
mod helper;
mod history;
mod repl;

pub use classifier::{classify, is_exit_command, Verdict, EXIT_COMMANDS};
pub use editor::{LineReader, ReadOutcome, RustylineReader};
pub use helper::{highlight_query, QueryHelper};
pub use history::history_path;
pub use repl::Repl;
