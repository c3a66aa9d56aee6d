//! Player-side event hook support: parse the player's `key=value` stdin
//! blob and fire the payload at the ingestion endpoint.
//!
//! The hook is invoked by the music player itself, so both halves are
//! fire-and-forget: any failure is logged and swallowed rather than
//! surfaced to the player process.

use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::ingest::RawEventPayload;

/// Parse the player's flat `key=value` text blob into a field map.
///
/// One entry per line, split on the first `=`. Lines without a `=` are
/// skipped. Later duplicates overwrite earlier ones.
pub fn parse_event_fields(input: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    for line in input.lines() {
        if let Some((key, value)) = line.split_once('=') {
            fields.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    fields
}

/// One-shot send to the ingestion endpoint on localhost. The write side is
/// shut down after the payload so the receiver sees end-of-stream as the
/// message boundary.
pub async fn send_event(
    event_port: u16,
    command: &str,
    fields: Map<String, Value>,
) -> std::io::Result<()> {
    let payload = RawEventPayload {
        command: command.to_string(),
        state: fields,
    };
    // Serializing our own payload type cannot fail.
    let message = serde_json::to_vec(&payload).unwrap();

    let mut stream = TcpStream::connect(("127.0.0.1", event_port)).await?;
    stream.write_all(&message).await?;
    stream.shutdown().await?;
    Ok(())
}
