// Integration tests for the HTTP backend against a mock server

use mockito::{Matcher, Server};
use quill::backend::HttpBackend;
use quill::config::ConnectionConfig;
use quill::connection::Backend;
use quill::errors::BackendError;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn backend_for(url: &str) -> HttpBackend {
    HttpBackend::new(&ConnectionConfig {
        url: url.to_string(),
        database: "main".to_string(),
        connect_timeout_secs: 2,
        request_timeout_secs: 5,
    })
}

#[tokio::test]
async fn test_connect_and_execute() {
    let mut server = Server::new_async().await;
    let alive = server
        .mock("GET", "/server/status/alive")
        .with_status(200)
        .with_body("\"OK\"")
        .create_async()
        .await;
    let query = server
        .mock("POST", "/db/main/edgeql")
        .match_body(Matcher::Json(json!({ "query": "select 1 + 1;" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": [2]}"#)
        .create_async()
        .await;

    let backend = backend_for(&server.url());
    let conn = backend.connect().await.unwrap();
    let output = conn.execute("select 1 + 1;").await.unwrap();

    assert_eq!(output.value(), &json!([2]));
    assert!(!conn.is_closing());
    alive.assert_async().await;
    query.assert_async().await;
}

#[tokio::test]
async fn test_connect_fails_when_server_not_ready() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/server/status/alive")
        .with_status(503)
        .create_async()
        .await;

    let err = backend_for(&server.url()).connect().await.err().unwrap();
    assert!(matches!(err, BackendError::Connect(_)));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_connect_fails_when_nothing_listens() {
    // Grab a free port, then release it
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = backend_for(&format!("http://{}", addr))
        .connect()
        .await
        .err()
        .unwrap();
    assert!(matches!(err, BackendError::Connect(_)));
    assert_eq!(err.kind(), "ConnectionError");
}

#[tokio::test]
async fn test_query_error_is_reported_and_connection_stays_open() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/server/status/alive")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("POST", "/db/main/edgeql")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"error": {"type": "InvalidReferenceError", "message": "object type 'default::Usr' does not exist"}}"#,
        )
        .create_async()
        .await;

    let conn = backend_for(&server.url()).connect().await.unwrap();
    let err = conn.execute("select Usr;").await.unwrap_err();

    assert_eq!(err.kind(), "InvalidReferenceError");
    assert_eq!(err.message(), "object type 'default::Usr' does not exist");
    assert!(!conn.is_closing());
}

#[tokio::test]
async fn test_transport_failure_marks_connection_closing() {
    // Answers the liveness probe once, then goes away
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let conn = backend_for(&format!("http://{}", addr))
        .connect()
        .await
        .unwrap();
    server.await.unwrap();

    let err = conn.execute("select 1;").await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
    assert!(conn.is_closing());
}
