//! End-to-end SSE transport tests.
//!
//! These tests run the HTTP server on a real socket and speak to it
//! with an HTTP client: monitoring endpoints, the event stream
//! handshake and the request back-channel.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use serde_json::{json, Value};
use tokio::time::timeout;
use wp_bridge::config::{AuthType, SiteConfig};
use wp_bridge::protocol::Dispatcher;
use wp_bridge::security::{MemorySink, SecurityGate};
use wp_bridge::server::{create_router, AppState, ServerConfig};
use wp_bridge::transport::TransportKind;
use wp_bridge::wp::SiteRegistry;

fn test_state() -> Arc<AppState> {
    let mut sites = HashMap::new();
    sites.insert(
        "default_test".to_string(),
        SiteConfig {
            url: "http://127.0.0.1:9".to_string(),
            username: "admin".to_string(),
            password: "app-password".to_string(),
            auth_type: AuthType::Basic,
            capabilities: None,
        },
    );
    let registry = SiteRegistry::new(sites).unwrap();
    let security = SecurityGate::new(Arc::new(MemorySink::new()));
    let dispatcher = Arc::new(Dispatcher::new(registry, security));
    Arc::new(AppState::new(ServerConfig::default(), dispatcher))
}

/// Bind an ephemeral port and serve the router on it
async fn start_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let router = create_router(test_state());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    (addr, handle)
}

/// Read the next named event block from an SSE byte stream
async fn read_event<S, B>(stream: &mut S, buffer: &mut String) -> (String, String)
where
    S: futures::Stream<Item = Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
{
    loop {
        if let Some(pos) = buffer.find("\n\n") {
            let block: String = buffer.drain(..pos + 2).collect();
            let mut event = String::new();
            let mut data = String::new();
            for line in block.lines() {
                if let Some(rest) = line.strip_prefix("event:") {
                    event = rest.trim().to_string();
                } else if let Some(rest) = line.strip_prefix("data:") {
                    data = rest.trim().to_string();
                }
            }
            // Comment-only blocks (keep-alives) carry no event name.
            if !event.is_empty() {
                return (event, data);
            }
            continue;
        }

        let chunk = stream
            .next()
            .await
            .expect("SSE stream ended early")
            .expect("SSE stream error");
        buffer.push_str(std::str::from_utf8(chunk.as_ref()).unwrap());
    }
}

#[tokio::test]
async fn test_health_and_status_endpoints() {
    let (addr, server) = start_server().await;
    let client = reqwest::Client::new();

    let response = timeout(
        Duration::from_secs(5),
        client.get(format!("http://{}/health", addr)).send(),
    )
    .await
    .expect("Request timed out")
    .expect("Request failed");
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let response = client
        .get(format!("http://{}/status", addr))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["active_connections"], json!(0));

    server.abort();
}

#[tokio::test]
async fn test_sse_handshake_and_tool_traffic() {
    let (addr, server) = start_server().await;
    let client = reqwest::Client::new();

    // Open the event stream. The first event names the back-channel.
    let response = timeout(
        Duration::from_secs(5),
        client.get(format!("http://{}/sse", addr)).send(),
    )
    .await
    .expect("Request timed out")
    .expect("Request failed");
    assert!(response.status().is_success());

    let mut stream = response.bytes_stream();
    let mut buffer = String::new();

    let (event, endpoint) = timeout(
        Duration::from_secs(5),
        read_event(&mut stream, &mut buffer),
    )
    .await
    .expect("No endpoint event");
    assert_eq!(event, "endpoint");
    assert!(endpoint.starts_with("/messages/"));

    // Initialize over the back-channel; the reply arrives on the stream.
    let accepted = client
        .post(format!("http://{}{}", addr, endpoint))
        .body(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"capabilities":{}}}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status(), reqwest::StatusCode::ACCEPTED);

    let (event, data) = timeout(
        Duration::from_secs(5),
        read_event(&mut stream, &mut buffer),
    )
    .await
    .expect("No initialize reply");
    assert_eq!(event, "message");
    let reply: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(reply["id"], json!(1));
    assert!(reply["result"]["protocolVersion"].is_string());

    // Tool traffic flows the same way.
    client
        .post(format!("http://{}{}", addr, endpoint))
        .body(r#"{"jsonrpc":"2.0","id":2,"method":"listTools"}"#)
        .send()
        .await
        .unwrap();

    let (event, data) = timeout(
        Duration::from_secs(5),
        read_event(&mut stream, &mut buffer),
    )
    .await
    .expect("No listTools reply");
    assert_eq!(event, "message");
    let reply: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(reply["result"]["tools"].as_array().unwrap().len(), 28);

    server.abort();
}

#[tokio::test]
async fn test_connection_shows_up_in_status() {
    let (addr, server) = start_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{}/sse", addr))
        .send()
        .await
        .unwrap();
    let mut stream = response.bytes_stream();
    let mut buffer = String::new();
    let (_, _) = timeout(
        Duration::from_secs(5),
        read_event(&mut stream, &mut buffer),
    )
    .await
    .expect("No endpoint event");

    let body: Value = client
        .get(format!("http://{}/status", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["active_connections"], json!(1));

    server.abort();
}

#[tokio::test]
async fn test_post_to_unknown_connection_is_rejected() {
    let (addr, server) = start_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/messages/424242", addr))
        .body(r#"{"jsonrpc":"2.0","id":1,"method":"listTools"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unknown connection");

    server.abort();
}

#[tokio::test]
async fn test_transport_kind_parsing() {
    assert_eq!(
        "stdio".parse::<TransportKind>().unwrap(),
        TransportKind::Stdio
    );
    assert_eq!("sse".parse::<TransportKind>().unwrap(), TransportKind::Sse);
    assert!("quic".parse::<TransportKind>().is_err());
}
