use std::net::SocketAddr;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpListener;
use tokio::time;

use playcast::config::Config;
use playcast::AppState;

pub type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Start the full service (ingestion endpoint + viewer WebSocket server) on
/// ephemeral ports. Returns the WebSocket address, the ingestion port, and
/// the shared state. Both servers run in the background.
pub async fn start_service() -> (SocketAddr, u16, AppState) {
    let state = AppState::new(Config::default());

    let event_listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ingest");
    let event_port = event_listener.local_addr().unwrap().port();
    tokio::spawn(playcast::ingest::run(event_listener, state.clone()));

    let ws_listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ws");
    let ws_addr = ws_listener.local_addr().unwrap();
    let app = playcast::gateway::server::router().with_state(state.clone());
    tokio::spawn(async move {
        axum::serve(
            ws_listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    (ws_addr, event_port, state)
}

/// Connect a viewer and consume the welcome push. Returns the stream and the
/// welcome's `params` object.
pub async fn connect_viewer(ws_addr: SocketAddr) -> (WsStream, serde_json::Value) {
    let url = format!("ws://{ws_addr}/ws");
    let (mut ws, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("ws connect");

    let welcome = recv_json(&mut ws).await;
    assert_eq!(welcome["jsonrpc"], "2.0");
    assert_eq!(welcome["method"], "event");
    (ws, welcome["params"].clone())
}

/// Read the next text message within a timeout and parse it as JSON.
pub async fn recv_json(ws: &mut WsStream) -> serde_json::Value {
    let msg = time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timeout waiting for push")
        .expect("stream ended")
        .expect("ws read error");
    let text = msg.into_text().expect("not text");
    serde_json::from_str(&text).expect("parse push")
}

/// Assert that no push arrives within a grace period.
pub async fn assert_no_push(ws: &mut WsStream) {
    let result = time::timeout(Duration::from_millis(300), ws.next()).await;
    assert!(result.is_err(), "unexpected message: {result:?}");
}

/// Poll until the store's current command matches, or panic after 2 s.
pub async fn wait_for_command(state: &AppState, command: &str) {
    for _ in 0..200 {
        if state.store.get().command.as_deref() == Some(command) {
            return;
        }
        time::sleep(Duration::from_millis(10)).await;
    }
    panic!("store never reached command {command:?}");
}
