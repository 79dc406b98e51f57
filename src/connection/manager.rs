// Connection lifecycle: lazy connect, liveness check, reconnect

use tracing::{debug, info, warn};

use super::{Backend, Connection, QueryOutput};
use crate::errors::{BackendError, ConsoleError};
use crate::runtime::{stdin_interrupt, InterruptSignal, LazyRuntime};

struct HeldConnection {
    connection: Box<dyn Connection>,
    /// Runtime generation the connection was opened under
    generation: u64,
}

/// Owns at most one backend connection plus the async context it runs on.
///
/// There is no retry loop in here: each `ensure_live` makes at most one
/// connect attempt. The REPL drives retries by calling it before every
/// statement.
pub struct ConnectionManager {
    backend: Box<dyn Backend>,
    runtime: LazyRuntime,
    held: Option<HeldConnection>,
}

impl ConnectionManager {
    /// Manager whose pending calls are interrupted by Ctrl-C when stdin is a
    /// terminal.
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self::with_interrupt(backend, stdin_interrupt())
    }

    pub fn with_interrupt(backend: Box<dyn Backend>, interrupt: Box<dyn InterruptSignal>) -> Self {
        Self {
            backend,
            runtime: LazyRuntime::new(interrupt),
            held: None,
        }
    }

    /// Whether a connection handle is currently held (it may still be dead).
    pub fn is_connected(&self) -> bool {
        self.held.is_some()
    }

    /// Return a live connection, connecting or reconnecting if needed.
    ///
    /// A held connection is reused unless it reports closing or was opened
    /// under an async context that has since been discarded.
    pub fn ensure_live(&mut self) -> Result<&dyn Connection, ConsoleError> {
        let live = match &self.held {
            Some(held) => {
                held.generation == self.runtime.generation() && !held.connection.is_closing()
            }
            None => false,
        };

        if !live {
            if self.held.take().is_some() {
                info!(target = %self.backend.target(), "Connection lost, reconnecting");
            }
            let connection = self.connect()?;
            self.held = Some(HeldConnection {
                connection,
                generation: self.runtime.generation(),
            });
        }

        match &self.held {
            Some(held) => Ok(held.connection.as_ref()),
            None => Err(not_connected()),
        }
    }

    /// Run `statement` on the held connection.
    ///
    /// Callers go through `ensure_live` first; without a held connection this
    /// fails with `ConnectionUnavailable`.
    pub fn execute(&mut self, statement: &str) -> Result<QueryOutput, ConsoleError> {
        let held = self.held.as_ref().ok_or_else(not_connected)?;

        debug!(bytes = statement.len(), "Executing statement");
        self.runtime
            .run(held.connection.execute(statement))?
            .map_err(ConsoleError::ExecutionFailed)
    }

    fn connect(&mut self) -> Result<Box<dyn Connection>, ConsoleError> {
        let target = self.backend.target();
        debug!(%target, "Connecting");

        match self.runtime.run(self.backend.connect()) {
            Ok(Ok(connection)) => {
                info!(%target, "Connected");
                Ok(connection)
            }
            Ok(Err(err)) => {
                warn!(%target, error = %err, "Connection attempt failed");
                Err(ConsoleError::ConnectionUnavailable(err))
            }
            Err(ConsoleError::ExecutionInterrupted) => Err(ConsoleError::ConnectionUnavailable(
                BackendError::Connect("connection attempt interrupted".to_string()),
            )),
            Err(err) => Err(err),
        }
    }
}

fn not_connected() -> ConsoleError {
    ConsoleError::ConnectionUnavailable(BackendError::Connect("not connected".to_string()))
}
