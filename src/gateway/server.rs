//! WebSocket upgrade handler and per-connection event loop.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{ConnectInfo, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use crate::player::StateUpdate;
use crate::AppState;

use super::events::{EventNotification, RpcErrorResponse, RpcRequest};
use super::session::ViewerSession;

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(ws_upgrade))
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state, remote_addr))
}

async fn handle_connection(socket: WebSocket, state: AppState, remote_addr: SocketAddr) {
    let (mut ws_tx, ws_rx) = socket.split();

    // Subscribe before snapshotting the store so an update that lands in
    // between is not missed. It may then arrive twice (once inside the
    // welcome snapshot, once as its own push), which viewers tolerate.
    let broadcast_rx = state.broadcast.subscribe();

    let welcome = state.store.get();
    let json = serde_json::to_string(&EventNotification::new(&welcome)).unwrap();
    if ws_tx.send(Message::Text(json.into())).await.is_err() {
        tracing::debug!(remote = %remote_addr, "viewer disconnected before welcome push");
        return;
    }

    let session = Arc::new(ViewerSession::new(remote_addr));
    state.viewers.add(session.clone());
    tracing::info!(
        session_id = %session.session_id,
        remote = %remote_addr,
        viewers = state.viewers.len(),
        "viewer session established"
    );

    run_session(session.clone(), ws_tx, ws_rx, broadcast_rx).await;

    state.viewers.remove(&session.session_id);
    tracing::info!(
        session_id = %session.session_id,
        remote = %remote_addr,
        viewers = state.viewers.len(),
        "viewer session ended"
    );
}

/// Main session loop: forward fan-out pushes, honor close, answer stray
/// requests. Any exit path leads back to registry removal in
/// `handle_connection`; a failure here never affects other sessions.
async fn run_session(
    session: Arc<ViewerSession>,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut ws_rx: SplitStream<WebSocket>,
    mut broadcast_rx: broadcast::Receiver<Arc<StateUpdate>>,
) {
    loop {
        tokio::select! {
            // A state update from the fan-out hub.
            result = broadcast_rx.recv() => {
                match result {
                    Ok(update) => {
                        let json = serde_json::to_string(&EventNotification::new(&update)).unwrap();
                        if let Err(err) = ws_tx.send(Message::Text(json.into())).await {
                            tracing::warn!(
                                session_id = %session.session_id,
                                %err,
                                "push failed, closing viewer session"
                            );
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            session_id = %session.session_id,
                            skipped,
                            "viewer session lagged behind fan-out"
                        );
                        // Continue — the viewer resumes from a newer update.
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            // The viewer sends us something.
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = answer_request(&text) {
                            if ws_tx.send(Message::Text(reply.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(session_id = %session.session_id, "viewer closed the connection");
                        break;
                    }
                    Some(Err(err)) => {
                        tracing::warn!(session_id = %session.session_id, %err, "viewer read error");
                        break;
                    }
                    _ => continue,
                }
            }
        }
    }
}

/// Request-handling extension point. No request methods are recognized yet:
/// a well-formed request carrying an id gets a method-not-found error back;
/// notifications and unparseable text are ignored.
fn answer_request(text: &str) -> Option<String> {
    let request: RpcRequest = serde_json::from_str(text).ok()?;
    let id = request.id?;
    tracing::debug!(method = %request.method, "unrecognized viewer request");
    Some(serde_json::to_string(&RpcErrorResponse::method_not_found(id, &request.method)).unwrap())
}
