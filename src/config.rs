/// Playcast configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port the ingestion endpoint listens on (loopback only).
    pub event_port: u16,
    /// TCP port the viewer-facing WebSocket server listens on.
    pub ws_port: u16,
}

/// Default ingestion port, kept compatible with existing player hooks.
pub const DEFAULT_EVENT_PORT: u16 = 12384;

/// Default viewer WebSocket port.
pub const DEFAULT_WS_PORT: u16 = 12385;

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults above when a variable is unset or unparseable.
    pub fn from_env() -> Self {
        Self {
            event_port: port_var("PLAYCAST_EVENT_PORT", DEFAULT_EVENT_PORT),
            ws_port: port_var("PLAYCAST_WS_PORT", DEFAULT_WS_PORT),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            event_port: DEFAULT_EVENT_PORT,
            ws_port: DEFAULT_WS_PORT,
        }
    }
}

fn port_var(name: &str, default: u16) -> u16 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_used_when_env_unset() {
        let config = Config::default();
        assert_eq!(config.event_port, DEFAULT_EVENT_PORT);
        assert_eq!(config.ws_port, DEFAULT_WS_PORT);
    }
}
