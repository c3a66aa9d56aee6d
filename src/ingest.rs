//! Local ingestion endpoint: accepts one-shot connections from the player
//! hook, decodes the event payload, applies it to the state store, and asks
//! the fan-out hub to push it to every viewer.
//!
//! The wire format is a single JSON document with no length prefix; the
//! message is complete when the peer closes its write side. Connections are
//! handled one at a time, which serializes updates: each update is applied
//! to the store and dispatched before the next connection is accepted.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time;

use crate::player::{StateUpdate, STATIONS_KEY};
use crate::AppState;

/// Upper bound on an event payload. A stalled or runaway hook cannot tie up
/// the endpoint with an unbounded read.
pub const MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// How long to wait for the peer to finish sending and close its write side.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after a failed `accept` before retrying.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Upper bound on `stationCount`. The count sizes an allocation before any
/// `station{i}` field is checked, so it must not be trusted: a max-size
/// payload cannot carry anywhere near this many station fields anyway.
pub const MAX_STATIONS: usize = 1024;

/// The flat payload the hook sends: an event command plus string fields.
#[derive(Debug, Serialize, Deserialize)]
pub struct RawEventPayload {
    pub command: String,
    pub state: Map<String, Value>,
}

/// Reasons an event payload gets discarded. None of these affect the
/// current state or any connected viewer.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("read timed out before the peer closed the connection")]
    Timeout,

    #[error("payload exceeds {MAX_PAYLOAD_BYTES} bytes")]
    PayloadTooLarge,

    #[error("i/o error reading payload: {0}")]
    Io(#[from] std::io::Error),

    #[error("payload is not a valid event: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("stationCount is not a valid integer: {0}")]
    InvalidStationCount(Value),

    #[error("stationCount {0} exceeds the supported maximum of {MAX_STATIONS}")]
    StationCountTooLarge(usize),
}

/// Accept loop. Runs for the process lifetime; per-connection failures are
/// logged and swallowed.
pub async fn run(listener: TcpListener, state: AppState) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::warn!(%err, "ingestion accept failed");
                // Persistent accept errors (e.g. fd exhaustion) would
                // otherwise spin this loop hot.
                time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };
        tracing::debug!(%peer, "event provider connected");

        match read_event(stream).await {
            Ok(update) => {
                tracing::info!(
                    command = update.command.as_deref().unwrap_or(""),
                    viewers = state.viewers.len(),
                    "new event received"
                );
                state.store.set(update.clone());
                state.broadcast.dispatch(update);
            }
            Err(err) => {
                tracing::warn!(%peer, %err, "discarding event");
            }
        }
    }
}

/// Read a complete payload (bounded in time and size), decode, transform.
async fn read_event(stream: TcpStream) -> Result<StateUpdate, IngestError> {
    let mut buf = Vec::new();
    let mut reader = stream.take(MAX_PAYLOAD_BYTES as u64 + 1);
    time::timeout(READ_TIMEOUT, reader.read_to_end(&mut buf))
        .await
        .map_err(|_| IngestError::Timeout)??;
    if buf.len() > MAX_PAYLOAD_BYTES {
        return Err(IngestError::PayloadTooLarge);
    }

    let payload: RawEventPayload = serde_json::from_slice(&buf)?;
    build_update(payload)
}

/// Pure transform from the flat wire payload to a [`StateUpdate`].
///
/// Station-list reconstruction: a string-encoded `stationCount` field names
/// how many `station{i}` fields to collect into the ordered `stations`
/// array. A missing index leaves a null placeholder at that slot (the list
/// keeps one slot per index). Without `stationCount`, `stations` is empty.
pub fn build_update(payload: RawEventPayload) -> Result<StateUpdate, IngestError> {
    let RawEventPayload { command, mut state } = payload;

    let stations = match state.shift_remove("stationCount") {
        Some(raw_count) => {
            let count: usize = raw_count
                .as_str()
                .and_then(|s| s.parse().ok())
                .ok_or(IngestError::InvalidStationCount(raw_count))?;
            if count > MAX_STATIONS {
                return Err(IngestError::StationCountTooLarge(count));
            }

            let mut stations = vec![Value::Null; count];
            for (i, slot) in stations.iter_mut().enumerate() {
                match state.shift_remove(&format!("station{i}")) {
                    Some(name) => *slot = name,
                    None => {
                        tracing::warn!(index = i, "invalid station list: station{i} does not exist");
                    }
                }
            }
            stations
        }
        None => Vec::new(),
    };
    state.insert(STATIONS_KEY.to_string(), Value::Array(stations));

    Ok(StateUpdate {
        command: Some(command),
        state,
    })
}
