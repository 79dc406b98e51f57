// HTTP client for the database query endpoint
//
// Connect probes the server's liveness endpoint, then statements are POSTed
// as JSON to the per-database query endpoint:
//
//   GET  {url}/server/status/alive
//   POST {url}/db/{database}/edgeql   { "query": "..." }
//     -> { "data": ... }  or  { "error": { "type": "...", "message": "..." } }

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ConnectionConfig;
use crate::connection::{Backend, Connection, QueryOutput};
use crate::errors::BackendError;

const ALIVE_PATH: &str = "/server/status/alive";

pub struct HttpBackend {
    base_url: String,
    database: String,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl HttpBackend {
    pub fn new(config: &ConnectionConfig) -> Self {
        Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            database: config.database.clone(),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    fn query_url(&self) -> String {
        format!("{}/db/{}/edgeql", self.base_url, self.database)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn connect(&self) -> Result<Box<dyn Connection>, BackendError> {
        let client = Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| BackendError::Connect(format!("failed to create HTTP client: {}", e)))?;

        let alive_url = format!("{}{}", self.base_url, ALIVE_PATH);
        debug!(url = %alive_url, "Probing server");

        let response = client
            .get(&alive_url)
            .send()
            .await
            .map_err(|e| BackendError::Connect(format!("cannot reach {}: {}", self.base_url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Connect(format!(
                "server at {} is not ready ({})",
                self.base_url, status
            )));
        }

        Ok(Box::new(HttpConnection {
            client,
            query_url: self.query_url(),
            closed: AtomicBool::new(false),
        }))
    }

    fn target(&self) -> String {
        format!("{} (database {})", self.base_url, self.database)
    }
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<QueryErrorBody>,
}

#[derive(Debug, Deserialize)]
struct QueryErrorBody {
    #[serde(rename = "type", default = "default_error_kind")]
    kind: String,
    #[serde(default)]
    message: String,
}

fn default_error_kind() -> String {
    "Error".to_string()
}

pub struct HttpConnection {
    client: Client,
    query_url: String,
    closed: AtomicBool,
}

impl HttpConnection {
    fn transport_failure(&self, err: reqwest::Error) -> BackendError {
        warn!(error = %err, "Transport failure, marking connection closed");
        self.closed.store(true, Ordering::Release);
        BackendError::Transport(err.to_string())
    }
}

#[async_trait]
impl Connection for HttpConnection {
    async fn execute(&self, statement: &str) -> Result<QueryOutput, BackendError> {
        let response = self
            .client
            .post(&self.query_url)
            .json(&QueryRequest { query: statement })
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_failure(e))?;

        parse_response(status, &body)
    }

    fn is_closing(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

fn parse_response(status: StatusCode, body: &str) -> Result<QueryOutput, BackendError> {
    let parsed: Option<QueryResponse> = serde_json::from_str(body).ok();

    match parsed {
        Some(QueryResponse {
            error: Some(error), ..
        }) => Err(BackendError::Query {
            kind: error.kind,
            message: error.message,
        }),
        Some(QueryResponse { data, .. }) if status.is_success() => {
            Ok(QueryOutput::new(data.unwrap_or(Value::Null)))
        }
        None if status.is_success() => Err(BackendError::Protocol(format!(
            "expected JSON body, got {} bytes",
            body.len()
        ))),
        _ => Err(BackendError::Query {
            kind: "HttpError".to_string(),
            message: format!("{} {}", status, body.trim()).trim().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_url_strips_trailing_slash() {
        let config = ConnectionConfig {
            url: "http://localhost:5656/".to_string(),
            database: "main".to_string(),
            ..ConnectionConfig::default()
        };
        let backend = HttpBackend::new(&config);
        assert_eq!(backend.query_url(), "http://localhost:5656/db/main/edgeql");
        assert_eq!(backend.target(), "http://localhost:5656 (database main)");
    }

    #[test]
    fn test_request_serializes() {
        let json = serde_json::to_string(&QueryRequest { query: "select 1;" }).unwrap();
        assert_eq!(json, r#"{"query":"select 1;"}"#);
    }

    #[test]
    fn test_parse_data_response() {
        let output = parse_response(StatusCode::OK, r#"{"data": [1, 2]}"#).unwrap();
        assert_eq!(output.value(), &json!([1, 2]));
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"error": {"message": "Unexpected 'selec'", "type": "EdgeQLSyntaxError", "code": 67174656}}"#;
        match parse_response(StatusCode::BAD_REQUEST, body) {
            Err(BackendError::Query { kind, message }) => {
                assert_eq!(kind, "EdgeQLSyntaxError");
                assert_eq!(message, "Unexpected 'selec'");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_without_type() {
        let err = parse_response(StatusCode::OK, r#"{"error": {"message": "boom"}}"#).unwrap_err();
        assert_eq!(err.to_string(), "Error: boom");
    }

    #[test]
    fn test_parse_non_json_failure() {
        let err = parse_response(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert_eq!(err.kind(), "HttpError");
        assert_eq!(err.message(), "502 Bad Gateway upstream down");
    }

    #[test]
    fn test_parse_non_json_success_is_protocol_error() {
        let err = parse_response(StatusCode::OK, "<html>").unwrap_err();
        assert_eq!(err.kind(), "ProtocolError");
    }

    #[test]
    fn test_missing_data_is_null() {
        let output = parse_response(StatusCode::OK, "{}").unwrap();
        assert_eq!(output.value(), &Value::Null);
    }
}
