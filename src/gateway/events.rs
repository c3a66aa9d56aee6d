//! Viewer-facing wire messages: the JSON-RPC 2.0 notification envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::player::StateUpdate;

pub const JSONRPC_VERSION: &str = "2.0";

/// Method name of every server push.
pub const EVENT_METHOD: &str = "event";

/// JSON-RPC error code for an unrecognized request method.
pub const METHOD_NOT_FOUND: i64 = -32601;

// ---------------------------------------------------------------------------
// Server → Viewer
// ---------------------------------------------------------------------------

/// A state push sent to a viewer. Notification-style: the server never
/// expects a response, so there is no `id`.
#[derive(Debug, Serialize)]
pub struct EventNotification<'a> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: &'a StateUpdate,
}

impl<'a> EventNotification<'a> {
    pub fn new(update: &'a StateUpdate) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: EVENT_METHOD,
            params: update,
        }
    }
}

/// Error response for a viewer request we do not handle.
#[derive(Debug, Serialize)]
pub struct RpcErrorResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    pub error: RpcError,
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcErrorResponse {
    pub fn method_not_found(id: Value, method: &str) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error: RpcError {
                code: METHOD_NOT_FOUND,
                message: format!("method not found: {method}"),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Viewer → Server
// ---------------------------------------------------------------------------

/// A request received from a viewer. No request methods are recognized yet;
/// this exists so the session loop can answer well-formed requests with a
/// proper JSON-RPC error instead of silence.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}
