// Error taxonomy for the console
//
// Library code returns these typed errors; the binary wraps them in anyhow at
// the top level. Only `ConsoleError::ConnectionUnavailable` (and the fatal
// runtime/io variants) ever end the process.

use thiserror::Error;

/// Lexical failure while scanning a buffer.
///
/// For the completeness classifier this is evidence that the statement is not
/// finished yet (an open string, quoted identifier or dollar quote), never an
/// error shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated {what} starting at {line}:{column}")]
    Unterminated {
        what: &'static str,
        line: u32,
        column: u32,
    },

    #[error("unexpected character {ch:?} at {line}:{column}")]
    UnknownToken { ch: char, line: u32, column: u32 },
}

/// Failure reported by a backend or one of its connections.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The connection could not be opened.
    #[error("{0}")]
    Connect(String),

    /// The statement reached the server and was rejected.
    #[error("{kind}: {message}")]
    Query { kind: String, message: String },

    /// The transport broke while a statement was in flight.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with something we could not decode.
    #[error("malformed response: {0}")]
    Protocol(String),
}

impl BackendError {
    /// Short error class name, printed before the message in the REPL.
    pub fn kind(&self) -> &str {
        match self {
            BackendError::Connect(_) => "ConnectionError",
            BackendError::Query { kind, .. } => kind,
            BackendError::Transport(_) => "TransportError",
            BackendError::Protocol(_) => "ProtocolError",
        }
    }

    /// Message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            BackendError::Connect(msg)
            | BackendError::Transport(msg)
            | BackendError::Protocol(msg) => msg,
            BackendError::Query { message, .. } => message,
        }
    }
}

/// Errors surfaced by the connection manager and the REPL loop.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// No connection could be established. Fatal for the session.
    #[error("Could not establish connection")]
    ConnectionUnavailable(#[source] BackendError),

    /// The user interrupted a pending statement.
    #[error("statement interrupted")]
    ExecutionInterrupted,

    /// The backend rejected or failed the statement.
    #[error(transparent)]
    ExecutionFailed(BackendError),

    /// The async execution context could not be created.
    #[error("failed to start async runtime")]
    Runtime(#[source] std::io::Error),

    /// Reading from the terminal or writing output failed.
    #[error("terminal I/O failed")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// Whether the REPL loop must stop the session on this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConsoleError::ConnectionUnavailable(_) | ConsoleError::Runtime(_) | ConsoleError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_query_error_formats_kind_and_message() {
        let err = BackendError::Query {
            kind: "InvalidReferenceError".to_string(),
            message: "object type 'default::Foo' does not exist".to_string(),
        };
        assert_eq!(err.kind(), "InvalidReferenceError");
        assert_eq!(
            err.to_string(),
            "InvalidReferenceError: object type 'default::Foo' does not exist"
        );
    }

    #[test]
    fn test_connection_unavailable_keeps_cause() {
        let err = ConsoleError::ConnectionUnavailable(BackendError::Connect(
            "connection refused".to_string(),
        ));
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "Could not establish connection");
        assert_eq!(err.source().unwrap().to_string(), "connection refused");
    }

    #[test]
    fn test_execution_errors_are_not_fatal() {
        assert!(!ConsoleError::ExecutionInterrupted.is_fatal());
        assert!(!ConsoleError::ExecutionFailed(BackendError::Transport("reset".into())).is_fatal());
    }

    #[test]
    fn test_runtime_and_io_errors_are_fatal() {
        let io = || std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert!(ConsoleError::Runtime(io()).is_fatal());
        assert!(ConsoleError::from(io()).is_fatal());
    }
}
