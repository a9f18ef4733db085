//! Multipart image uploads into the open project form.
//!
//! Every file part is compressed concurrently; the response reports how many
//! were stored, failed to decode, or arrived after their target was closed.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use roombrief_core::error::CoreError;
use roombrief_core::ingest::{ImageTarget, IngestReport, Upload};
use roombrief_core::types::EntityId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Form field names accepted as image files.
const FILE_FIELDS: &[&str] = &["file", "files", "images"];

/// POST /api/v1/session/rooms/{room_id}/images
pub async fn upload_room_images(
    State(state): State<AppState>,
    Path(room_id): Path<EntityId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<IngestReport>>> {
    if !state.session.has_room(room_id).await {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id.to_string(),
        }));
    }
    let uploads = read_uploads(multipart).await?;

    let report = state
        .session
        .ingest(ImageTarget::Room(room_id), uploads)
        .await;
    Ok(Json(DataResponse::new(report)))
}

/// POST /api/v1/session/item-draft/image
///
/// Sets the image of the open furniture or decoration entry. Only the first
/// file part is used.
pub async fn upload_item_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<IngestReport>>> {
    let token = state.session.item_draft_token().await.ok_or_else(|| {
        AppError::BadRequest("No furniture or decoration entry is open".into())
    })?;
    let mut uploads = read_uploads(multipart).await?;
    if uploads.len() > 1 {
        tracing::debug!(ignored = uploads.len() - 1, "Extra files in item image upload ignored");
        uploads.truncate(1);
    }

    let report = state
        .session
        .ingest(ImageTarget::ItemDraft(token), uploads)
        .await;
    Ok(Json(DataResponse::new(report)))
}

/// Collect every file part. Fails if there are none.
async fn read_uploads(mut multipart: Multipart) -> AppResult<Vec<Upload>> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if !FILE_FIELDS.contains(&name.as_str()) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        uploads.push(Upload {
            file_name,
            bytes: data.to_vec(),
        });
    }

    if uploads.is_empty() {
        return Err(AppError::BadRequest(
            "Missing required 'file' field".into(),
        ));
    }
    Ok(uploads)
}
