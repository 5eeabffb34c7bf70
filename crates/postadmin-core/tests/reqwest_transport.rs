//! Tests of the reqwest-backed transport against a loopback listener that
//! serves one canned HTTP response per test.

use std::sync::Arc;

use postadmin_core::api::{ReqwestTransport, RequestError};
use postadmin_core::shell::TracingNotifier;
use postadmin_core::{MemorySessionStore, Navigator, RequestClient, RequestDescriptor, SessionStore};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate_to_login(&self) {}
}

/// Serve a single response and hand back the raw request head.
async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    serve_raw(response).await
}

/// Serve exactly the given bytes, then close the connection.
async fn serve_raw(response: String) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if n == 0 || buf.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });

    (format!("http://{}", addr), rx)
}

/// Headers promise more body than the server sends before closing.
fn cut_short(status_line: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: 100\r\nConnection: close\r\n\r\n{{\"detail\"",
        status_line
    )
}

fn client(base_url: &str, session: &MemorySessionStore) -> RequestClient {
    RequestClient::with_transport(
        base_url,
        Arc::new(ReqwestTransport::new(None).unwrap()),
        Arc::new(session.clone()),
        Arc::new(TracingNotifier),
        Arc::new(NoopNavigator),
    )
}

#[tokio::test]
async fn test_bearer_header_and_json_body_over_http() {
    let (base_url, request) = serve_once("200 OK", r#"{"id":1}"#).await;
    let session = MemorySessionStore::with_token("abc123");

    let body = client(&base_url, &session)
        .issue(RequestDescriptor::get("/users"))
        .await
        .unwrap();
    assert_eq!(body, json!({"id": 1}));

    let head = request.await.unwrap().to_lowercase();
    assert!(head.starts_with("get /users http/1.1"));
    assert!(head.contains("authorization: bearer abc123"));
}

#[tokio::test]
async fn test_get_params_are_sent_as_query_string() {
    let (base_url, request) = serve_once("200 OK", "[]").await;
    let session = MemorySessionStore::new();

    client(&base_url, &session)
        .get("/posts", json!({"page": 2}))
        .await
        .unwrap();

    let head = request.await.unwrap();
    assert!(head.starts_with("GET /posts?page=2 HTTP/1.1"));
    assert!(!head.to_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn test_401_over_http_clears_session() {
    let (base_url, _request) = serve_once("401 Unauthorized", r#"{"detail":"Could not validate credentials"}"#).await;
    let session = MemorySessionStore::with_token("expired");

    let err = client(&base_url, &session)
        .issue(RequestDescriptor::get("/posts"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.response().unwrap().detail(), Some("Could not validate credentials"));
    assert_eq!(session.get(), None);
}

#[tokio::test]
async fn test_401_with_truncated_body_still_clears_session() {
    let (base_url, _request) = serve_raw(cut_short("401 Unauthorized")).await;
    let session = MemorySessionStore::with_token("expired");

    let err = client(&base_url, &session)
        .issue(RequestDescriptor::get("/posts"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.response().unwrap().body, serde_json::Value::Null);
    assert_eq!(session.get(), None);
}

#[tokio::test]
async fn test_success_with_truncated_body_is_transport_error() {
    let (base_url, _request) = serve_raw(cut_short("200 OK")).await;
    let session = MemorySessionStore::with_token("abc123");

    let err = client(&base_url, &session)
        .issue(RequestDescriptor::get("/users"))
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert_eq!(session.get().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let session = MemorySessionStore::with_token("abc123");
    let err = client(&format!("http://{}", addr), &session)
        .issue(RequestDescriptor::get("/users"))
        .await
        .unwrap_err();
    assert!(matches!(err, RequestError::Transport(_)));
    assert_eq!(session.get().as_deref(), Some("abc123"));
}
