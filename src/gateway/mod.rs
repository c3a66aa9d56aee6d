//! Viewer-facing WebSocket gateway: wire protocol, fan-out hub, session
//! registry, and the per-connection event loop.

pub mod events;
pub mod fanout;
pub mod registry;
pub mod server;
pub mod session;
