//! WebSocket infrastructure for pushing session state.
//!
//! Provides connection management, heartbeat pings, and the HTTP upgrade
//! handler mounted at `/ws`.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::{start_heartbeat, start_heartbeat_every, HEARTBEAT_INTERVAL_SECS};
pub use manager::WsManager;
