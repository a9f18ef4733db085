//! Route definitions for the shared UI session.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{images, session};
use crate::state::AppState;

/// Routes mounted at `/session`.
///
/// ```text
/// GET    /                                  -> get_session
/// POST   /actions                           -> post_action
/// POST   /rooms/{room_id}/images            -> upload_room_images
/// POST   /item-draft/image                  -> upload_item_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(session::get_session))
        .route("/actions", post(session::post_action))
        .route("/rooms/{room_id}/images", post(images::upload_room_images))
        .route("/item-draft/image", post(images::upload_item_image))
}
