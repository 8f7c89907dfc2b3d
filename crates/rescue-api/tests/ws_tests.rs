//! Integration tests for the `WebSocket` push channel.
//!
//! Each test serves the real router on an ephemeral local port and talks
//! to it with a `tokio-tungstenite` client. The broadcast timers are not
//! started, so every frame a client sees is a direct reply.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use rescue_api::router::build_router;
use rescue_api::state::AppState;
use rescue_core::config::SimulationSection;
use rescue_llm::LanguageClient;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const FRAME_WAIT: Duration = Duration::from_secs(2);
const QUIET_WAIT: Duration = Duration::from_millis(200);

async fn spawn_app() -> (Arc<AppState>, SocketAddr) {
    let collaborator = LanguageClient::offline(Duration::from_secs(1)).unwrap();
    let simulation = SimulationSection {
        seed: Some(11),
        ..SimulationSection::default()
    };
    let state = Arc::new(AppState::seeded(collaborator, simulation));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_router(Arc::clone(&state));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (state, addr)
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    client
}

/// Next text frame as JSON, skipping control frames.
async fn next_json(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(FRAME_WAIT, client.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Whether another text frame arrives within [`QUIET_WAIT`].
async fn has_more_text(client: &mut Client) -> bool {
    loop {
        match tokio::time::timeout(QUIET_WAIT, client.next()).await {
            Err(_) | Ok(None | Some(Err(_))) => return false,
            Ok(Some(Ok(Message::Text(_)))) => return true,
            Ok(Some(Ok(_))) => {}
        }
    }
}

#[tokio::test]
async fn first_frame_is_initial_snapshot() {
    let (_state, addr) = spawn_app().await;
    let mut client = connect(addr).await;

    let frame = next_json(&mut client).await;

    assert_eq!(frame["kind"], "initial");
    assert_eq!(frame["payload"]["inventory"].as_array().unwrap().len(), 5);
    assert_eq!(frame["payload"]["alerts"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_kind_gets_exactly_one_error() {
    let (_state, addr) = spawn_app().await;
    let mut client = connect(addr).await;
    let _ = next_json(&mut client).await;

    client
        .send(Message::Text(r#"{"kind": "dance"}"#.into()))
        .await
        .unwrap();

    let frame = next_json(&mut client).await;
    assert_eq!(frame["kind"], "error");
    assert!(frame["message"].as_str().unwrap().contains("dance"));
    assert!(!has_more_text(&mut client).await);
}

#[tokio::test]
async fn binary_frame_gets_exactly_one_error() {
    let (_state, addr) = spawn_app().await;
    let mut client = connect(addr).await;
    let _ = next_json(&mut client).await;

    client
        .send(Message::Binary(vec![1_u8, 2, 3].into()))
        .await
        .unwrap();

    let frame = next_json(&mut client).await;
    assert_eq!(frame["kind"], "error");
    assert!(!has_more_text(&mut client).await);
}

#[tokio::test]
async fn empty_chat_gets_error_frame() {
    let (_state, addr) = spawn_app().await;
    let mut client = connect(addr).await;
    let _ = next_json(&mut client).await;

    client
        .send(Message::Text(r#"{"kind": "chat", "message": ""}"#.into()))
        .await
        .unwrap();

    let frame = next_json(&mut client).await;
    assert_eq!(frame["kind"], "error");
}

#[tokio::test]
async fn chat_reply_goes_to_sender_only() {
    let (_state, addr) = spawn_app().await;
    let mut asker = connect(addr).await;
    let mut bystander = connect(addr).await;
    let _ = next_json(&mut asker).await;
    let _ = next_json(&mut bystander).await;

    asker
        .send(Message::Text(
            r#"{"kind": "chat", "message": "forecast please"}"#.into(),
        ))
        .await
        .unwrap();

    let frame = next_json(&mut asker).await;
    assert_eq!(frame["kind"], "chat_response");
    assert!(!has_more_text(&mut bystander).await);
}

#[tokio::test]
async fn restock_command_is_broadcast_to_everyone() {
    let (_state, addr) = spawn_app().await;
    let mut sender = connect(addr).await;
    let mut watcher = connect(addr).await;
    let _ = next_json(&mut sender).await;
    let _ = next_json(&mut watcher).await;

    sender
        .send(Message::Text(
            r#"{"kind": "request_restock", "item": "Electronics"}"#.into(),
        ))
        .await
        .unwrap();

    let seen_by_sender = next_json(&mut sender).await;
    let seen_by_watcher = next_json(&mut watcher).await;
    assert_eq!(seen_by_sender["kind"], "restock_initiated");
    assert_eq!(seen_by_watcher["kind"], "restock_initiated");
    assert_eq!(seen_by_watcher["payload"]["quantity"], 500);
}

#[tokio::test]
async fn closing_the_socket_unregisters() {
    let (state, addr) = spawn_app().await;
    let mut client = connect(addr).await;
    let _ = next_json(&mut client).await;
    assert_eq!(state.registry.len().await, 1);

    client.close(None).await.unwrap();

    let deadline = tokio::time::Instant::now().checked_add(FRAME_WAIT).unwrap();
    while state.registry.len().await != 0 {
        assert!(tokio::time::Instant::now() < deadline, "connection still registered");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
