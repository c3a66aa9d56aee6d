//! Now-playing data model and the single current-state snapshot.

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value};

/// Field name of the reconstructed station list inside [`StateUpdate::state`].
pub const STATIONS_KEY: &str = "stations";

/// One complete now-playing snapshot as pushed to viewers.
///
/// `command` is the player event that produced the snapshot (`songstart`,
/// `songfinish`, ...). It is `None` only for the synthetic welcome push a
/// viewer receives before any real event has arrived.
///
/// `state` is a flat, insertion-ordered field map. It always contains a
/// `stations` array of station names; a slot is `null` where the source
/// data had a gap.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StateUpdate {
    pub command: Option<String>,
    pub state: Map<String, Value>,
}

impl Default for StateUpdate {
    fn default() -> Self {
        let mut state = Map::new();
        state.insert(STATIONS_KEY.to_string(), Value::Array(Vec::new()));
        Self {
            command: None,
            state,
        }
    }
}

/// Holds the single live [`StateUpdate`]. Last write wins; no history.
///
/// The store itself does not notify anyone. The ingestion loop is
/// responsible for dispatching to the broadcast hub after a `set`.
pub struct StateStore {
    current: RwLock<StateUpdate>,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(StateUpdate::default()),
        }
    }

    /// The latest applied update, or the empty default before the first one.
    pub fn get(&self) -> StateUpdate {
        self.current.read().clone()
    }

    /// Replace the current update wholesale.
    pub fn set(&self, update: StateUpdate) {
        *self.current.write() = update;
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
