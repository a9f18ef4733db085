//! Handlers for the `/session` resource.

use axum::extract::State;
use axum::Json;

use crate::action::UiAction;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::view::SessionView;

/// GET /api/v1/session
pub async fn get_session(State(state): State<AppState>) -> Json<DataResponse<SessionView>> {
    Json(DataResponse::new(state.session.view().await))
}

/// POST /api/v1/session/actions
///
/// Apply one UI action and return the resulting view. No-op actions return
/// the unchanged view; a rejected line item save returns 400.
pub async fn post_action(
    State(state): State<AppState>,
    Json(action): Json<UiAction>,
) -> AppResult<Json<DataResponse<SessionView>>> {
    let view = state.session.dispatch(action).await?;
    Ok(Json(DataResponse::new(view)))
}
