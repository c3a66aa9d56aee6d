pub mod config;
pub mod gateway;
pub mod hook;
pub mod ingest;
pub mod player;

use std::sync::Arc;

use config::Config;
use gateway::fanout::EventBroadcast;
use gateway::registry::ViewerRegistry;
use player::StateStore;

/// Shared application state available to the ingestion loop and every
/// gateway connection.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StateStore>,
    pub broadcast: EventBroadcast,
    pub viewers: Arc<ViewerRegistry>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            store: Arc::new(StateStore::new()),
            broadcast: EventBroadcast::new(),
            viewers: Arc::new(ViewerRegistry::new()),
            config: Arc::new(config),
        }
    }
}
