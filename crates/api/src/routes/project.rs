//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{advice, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// Projects are created, edited and deleted through session actions, so
/// this tree is read-only apart from the AI summary.
///
/// ```text
/// GET    /                                  -> list
/// GET    /{id}/briefing                     -> briefing
/// POST   /{id}/summary                      -> project_summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list))
        .route("/{id}/briefing", get(project::briefing))
        .route("/{id}/summary", post(advice::project_summary))
}
