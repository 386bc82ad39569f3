//! Integration tests for WebSocket presence and chat.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::helpers::TestApp;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr) -> Client {
    let (ws, _) = connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("WebSocket connect failed");
    ws
}

async fn send(ws: &mut Client, event: Value) {
    ws.send(Message::Text(event.to_string().into()))
        .await
        .expect("send failed");
}

async fn recv(ws: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("socket error");
        if let Message::Text(_) = msg {
            return serde_json::from_str(msg.to_text().unwrap()).unwrap();
        }
    }
}

async fn assert_silent(ws: &mut Client) {
    let next = tokio::time::timeout(Duration::from_millis(300), ws.next()).await;
    assert!(next.is_err(), "unexpected frame: {next:?}");
}

async fn join(app: &TestApp, ws: &mut Client, username: &str, role: &str) {
    let joins_before = app.state.realtime.metrics.snapshot().joins;
    send(ws, json!({ "type": "join", "username": username, "role": role })).await;
    app.wait_until(|state| async move { state.realtime.metrics.snapshot().joins > joins_before })
        .await;
}

#[tokio::test]
async fn test_student_join_is_told_about_connected_tutor() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut erin = connect(addr).await;
    join(&app, &mut erin, "erin", "tutor").await;

    let mut dana = connect(addr).await;
    send(&mut dana, json!({ "type": "join", "username": "dana", "role": "student" })).await;

    assert_eq!(recv(&mut dana).await, json!({ "type": "matched", "tutor": "erin" }));
    assert_silent(&mut erin).await;
}

#[tokio::test]
async fn test_chat_relay_and_offline_drop() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut erin = connect(addr).await;
    join(&app, &mut erin, "erin", "tutor").await;
    let mut dana = connect(addr).await;
    join(&app, &mut dana, "dana", "student").await;
    assert_eq!(recv(&mut dana).await["type"], "matched");

    send(
        &mut dana,
        json!({ "type": "chatMessage", "sender": "dana", "receiver": "erin", "message": "hi" }),
    )
    .await;
    assert_eq!(
        recv(&mut erin).await,
        json!({ "type": "chatMessage", "sender": "dana", "message": "hi" })
    );

    send(
        &mut dana,
        json!({ "type": "chatMessage", "sender": "dana", "receiver": "ghost", "message": "?" }),
    )
    .await;
    assert_silent(&mut dana).await;
    assert_silent(&mut erin).await;
}

#[tokio::test]
async fn test_rejoin_overwrites_previous_connection() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut erin_old = connect(addr).await;
    join(&app, &mut erin_old, "erin", "tutor").await;
    let mut erin_new = connect(addr).await;
    join(&app, &mut erin_new, "erin", "tutor").await;

    let mut dana = connect(addr).await;
    join(&app, &mut dana, "dana", "student").await;
    recv(&mut dana).await;

    send(
        &mut dana,
        json!({ "type": "chatMessage", "sender": "dana", "receiver": "erin", "message": "hello" }),
    )
    .await;
    assert_eq!(recv(&mut erin_new).await["message"], "hello");
    assert_silent(&mut erin_old).await;
}

#[tokio::test]
async fn test_disconnect_removes_session() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut erin = connect(addr).await;
    join(&app, &mut erin, "erin", "tutor").await;
    assert!(app.state.realtime.presence.lookup("erin").await.is_some());

    erin.close(None).await.expect("close failed");
    app.wait_until(|state| async move { state.realtime.presence.lookup("erin").await.is_none() })
        .await;

    // A student joining afterwards hears about nobody.
    let mut dana = connect(addr).await;
    join(&app, &mut dana, "dana", "student").await;
    assert_silent(&mut dana).await;
}

#[tokio::test]
async fn test_bad_frame_returns_error() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut ws = connect(addr).await;
    send(&mut ws, json!({ "type": "wave" })).await;

    let frame = recv(&mut ws).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["code"], "INVALID_MESSAGE");

    join(&app, &mut ws, "erin", "tutor").await;
}
