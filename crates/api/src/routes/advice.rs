use axum::routing::post;
use axum::Router;

use crate::handlers::advice;
use crate::state::AppState;

/// Routes merged into `/api/v1`.
///
/// ```text
/// POST   /style-suggestions                 -> style_suggestions
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/style-suggestions", post(advice::style_suggestions))
}
