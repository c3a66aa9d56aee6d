//! One-shot event hook invoked by the music player on every state change.
//!
//! Called with exactly one argument (the event name) and a `key=value` blob
//! on stdin. Always exits 0: the player does not expect hook failures to be
//! fatal, so connect or send errors are only logged.

use std::io::Read;

use playcast::config::Config;
use playcast::hook;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 1 {
        tracing::error!(?args, "expected exactly one event argument");
        return;
    }
    let command = &args[0];

    let mut input = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut input) {
        tracing::error!(%err, "failed to read event data from stdin");
        return;
    }
    let fields = hook::parse_event_fields(&input);

    let config = Config::from_env();
    if let Err(err) = hook::send_event(config.event_port, command, fields).await {
        tracing::error!(%err, event_port = config.event_port, "unable to reach playcast service");
    }
}
