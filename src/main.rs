use std::net::SocketAddr;
use std::path::Path;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playcast::config::Config;
use playcast::{gateway, ingest, AppState};

#[tokio::main]
async fn main() {
    // Load .env file (silently skip if missing — env vars may be set externally)
    if dotenvy::dotenv().is_err() {
        let env_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(env_path);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let state = AppState::new(config.clone());

    let event_addr = SocketAddr::from(([127, 0, 0, 1], config.event_port));
    let event_listener = TcpListener::bind(event_addr)
        .await
        .unwrap_or_else(|err| panic!("failed to bind ingestion port {event_addr}: {err}"));
    tracing::info!(%event_addr, "ingestion endpoint listening");

    let ws_addr = SocketAddr::from(([0, 0, 0, 0], config.ws_port));
    let ws_listener = TcpListener::bind(ws_addr)
        .await
        .unwrap_or_else(|err| panic!("failed to bind viewer port {ws_addr}: {err}"));
    tracing::info!(%ws_addr, "viewer websocket listening");

    let app = gateway::server::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let ingest_task = tokio::spawn(ingest::run(event_listener, state));
    let serve_task = tokio::spawn(async move {
        axum::serve(
            ws_listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    });

    // Either task finishing means the relay is half-running: treat as fatal.
    tokio::select! {
        result = ingest_task => {
            tracing::error!(?result, "ingestion endpoint terminated");
        }
        result = serve_task => {
            tracing::error!(?result, "viewer server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            return;
        }
    }
    std::process::exit(1);
}
