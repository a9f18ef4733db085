pub mod advice;
pub mod health;
pub mod project;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /session                                         current view (GET)
/// /session/actions                                 dispatch a UI action (POST)
/// /session/rooms/{room_id}/images                  upload room images (POST, multipart)
/// /session/item-draft/image                        set the open entry's image (POST, multipart)
///
/// /projects                                        project cards (GET)
/// /projects/{id}/briefing                          briefing arranged by layout (GET)
/// /projects/{id}/summary                           AI summary (POST)
///
/// /style-suggestions                               AI style ideas (POST)
/// ```
///
/// The session WebSocket lives at the root as `/ws`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/session", session::router())
        .nest("/projects", project::router())
        .merge(advice::router())
}
