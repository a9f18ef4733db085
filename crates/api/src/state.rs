use std::sync::Arc;

use roombrief_db::ProjectStore;
use roombrief_genai::Advisor;

use crate::config::ServerConfig;
use crate::session::Session;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Project document store.
    pub store: Arc<dyn ProjectStore>,
    /// The UI session driven by `/session` actions.
    pub session: Session,
    /// Design summaries and style suggestions.
    pub advisor: Advisor,
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
}
