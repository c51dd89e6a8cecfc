//! Tests against a real TCP listener.
//!
//! Connection handling is invisible to `oneshot` router tests, so these
//! speak raw HTTP/1.1 to a server bound on an ephemeral port.

use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

use inkcard::assets::AssetLoader;
use inkcard::server::{build_router, create_app_state};

async fn spawn_server() -> u16 {
    let state = create_app_state(Arc::new(AssetLoader::new(None, None)))
        .expect("Failed to create app state");
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    port
}

/// Raw response split at the header terminator; header names lowercased.
struct RawResponse {
    head: String,
    body: Vec<u8>,
}

/// Send one request and read until the server closes the socket.
async fn send(port: u16, request: &str) -> RawResponse {
    let mut stream = TcpStream::connect(("127.0.0.1", port))
        .await
        .expect("Failed to connect");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("Failed to write request");

    let mut raw = Vec::new();
    timeout(Duration::from_secs(10), stream.read_to_end(&mut raw))
        .await
        .expect("Server kept the connection open")
        .expect("Failed to read response");

    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("No header terminator");
    RawResponse {
        head: String::from_utf8_lossy(&raw[..split]).to_lowercase(),
        body: raw[split + 4..].to_vec(),
    }
}

#[tokio::test]
async fn test_keep_alive_request_is_closed() {
    let port = spawn_server().await;

    // The client asks for keep-alive; the server still closes
    let response = send(
        port,
        "GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: keep-alive\r\n\r\n",
    )
    .await;

    assert!(response.head.starts_with("http/1.1 200"), "{}", response.head);
    assert!(response.head.contains("connection: close"));
    assert_eq!(response.body, b"OK");
}

#[tokio::test]
async fn test_sequential_requests_use_fresh_connections() {
    let port = spawn_server().await;

    for _ in 0..3 {
        let response = send(port, "GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
        assert!(response.head.contains("200 ok"));
    }
}

#[tokio::test]
async fn test_export_over_tcp() {
    let port = spawn_server().await;

    let created = send(
        port,
        "POST /api/scenes HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\n\r\n",
    )
    .await;
    assert!(created.head.contains("201 created"), "{}", created.head);
    let json: serde_json::Value = serde_json::from_slice(&created.body).unwrap();
    let id = json["id"].as_str().unwrap();

    let export = send(
        port,
        &format!("GET /api/scenes/{id}/export.jpg HTTP/1.1\r\nHost: localhost\r\n\r\n"),
    )
    .await;
    assert!(export.head.contains("200 ok"));
    assert!(export.head.contains("content-type: image/jpeg"));
    assert!(export.head.contains("connection: close"));
    assert_eq!(export.body[..2], [0xFF, 0xD8]);
}
