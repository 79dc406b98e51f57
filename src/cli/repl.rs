// Interactive read-eval-print loop
//
// One cycle: read a statement, ignore blanks, stop on an exit command,
// make sure the connection is live, execute, print. Execution errors are
// printed and the session goes on; a connection that cannot be (re)opened
// ends the session.

use std::io::Write;
use tracing::{debug, info};

use super::classifier::{classify, is_exit_command};
use super::editor::{LineReader, ReadOutcome};
use crate::config::constants::{CONTINUATION_PROMPT, PRIMARY_PROMPT};
use crate::connection::ConnectionManager;
use crate::errors::ConsoleError;

enum Flow {
    Continue,
    Exit,
}

pub struct Repl<R: LineReader, W: Write> {
    reader: R,
    connections: ConnectionManager,
    out: W,
}

impl<R: LineReader, W: Write> Repl<R, W> {
    pub fn new(reader: R, connections: ConnectionManager, out: W) -> Self {
        Self {
            reader,
            connections,
            out,
        }
    }

    /// Run until an exit command or end of input.
    ///
    /// Connects eagerly so a dead server is reported before the first prompt.
    /// Returns an error only when the session cannot continue.
    pub fn run(&mut self) -> Result<(), ConsoleError> {
        self.connections.ensure_live()?;

        while let Some(buffer) = self.read_statement()? {
            if let Flow::Exit = self.handle_statement(&buffer)? {
                info!("Exit command received");
                return Ok(());
            }
        }

        info!("End of input");
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Accumulate lines until the classifier accepts the buffer. Returns
    /// `None` at end of input.
    ///
    /// An interactive editor already applies the classifier, so this usually
    /// takes a single read; piped input arrives line by line.
    fn read_statement(&mut self) -> Result<Option<String>, ConsoleError> {
        let mut buffer = String::new();

        loop {
            let prompt = if buffer.is_empty() {
                PRIMARY_PROMPT
            } else {
                CONTINUATION_PROMPT
            };

            match self.reader.read_line(prompt)? {
                ReadOutcome::Line(line) => {
                    if !buffer.is_empty() {
                        buffer.push('\n');
                    }
                    buffer.push_str(&line);

                    if buffer.trim().is_empty() || classify(&buffer).is_submit() {
                        return Ok(Some(buffer));
                    }
                }
                ReadOutcome::Interrupted => {
                    debug!("Input discarded");
                    buffer.clear();
                }
                ReadOutcome::Eof => return Ok(None),
            }
        }
    }

    fn handle_statement(&mut self, buffer: &str) -> Result<Flow, ConsoleError> {
        let statement = buffer.trim();

        if statement.is_empty() {
            return Ok(Flow::Continue);
        }

        self.reader.add_history(statement);

        if is_exit_command(statement) {
            return Ok(Flow::Exit);
        }

        self.connections.ensure_live()?;

        match self.connections.execute(statement) {
            Ok(output) => writeln!(self.out, "{}", output)?,
            Err(err) if err.is_fatal() => return Err(err),
            Err(ConsoleError::ExecutionFailed(err)) => {
                writeln!(self.out, "{}: {}", err.kind(), err.message())?
            }
            Err(err) => debug!(error = %err, "Statement abandoned"),
        }
        self.out.flush()?;

        Ok(Flow::Continue)
    }
}
