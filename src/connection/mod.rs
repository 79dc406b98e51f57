// Backend connection abstraction
//
// The console only needs three things from a database client: open a
// connection, run a statement on it, and ask whether its transport is gone.
// Everything else (wire format, auth) lives behind these traits.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::errors::BackendError;

mod manager;

pub use manager::ConnectionManager;

/// Factory for backend connections.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Open a new connection.
    async fn connect(&self) -> Result<Box<dyn Connection>, BackendError>;

    /// Human-readable description of where we connect to (for logs)
    fn target(&self) -> String;
}

/// A live session with the backend.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Run one statement (possibly several `;`-separated ones) and return the
    /// result of the last.
    async fn execute(&self, statement: &str) -> Result<QueryOutput, BackendError>;

    /// Liveness check: true once the underlying transport is closed or
    /// closing. Must be cheap and must not block.
    fn is_closing(&self) -> bool;
}

/// Result value of a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput(Value);

impl QueryOutput {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for QueryOutput {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for QueryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
