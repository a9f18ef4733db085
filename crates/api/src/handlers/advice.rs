//! AI-assisted design advice.
//!
//! Both endpoints always succeed once the input is valid; generation
//! failures come back as fallback text.

use axum::extract::{Path, State};
use axum::Json;
use roombrief_core::types::ProjectId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::project::find_project;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct StyleRequest {
    pub description: String,
}

/// POST /api/v1/projects/{id}/summary
pub async fn project_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<AdviceResponse>>> {
    let project = find_project(&state, ProjectId::new(id)).await?;
    let text = state.advisor.project_summary(&project).await;
    Ok(Json(DataResponse::new(AdviceResponse { text })))
}

/// POST /api/v1/style-suggestions
pub async fn style_suggestions(
    State(state): State<AppState>,
    Json(input): Json<StyleRequest>,
) -> AppResult<Json<DataResponse<AdviceResponse>>> {
    if input.description.trim().is_empty() {
        return Err(AppError::BadRequest("Description cannot be empty".into()));
    }
    let text = state.advisor.suggest_styles(&input.description).await;
    Ok(Json(DataResponse::new(AdviceResponse { text })))
}
