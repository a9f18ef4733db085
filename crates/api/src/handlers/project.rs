//! Read-only project views.

use axum::extract::{Path, Query, State};
use axum::Json;
use roombrief_core::error::CoreError;
use roombrief_core::project::Project;
use roombrief_core::types::{EntityId, ProjectId};
use roombrief_core::view::{BriefingView, Layout, LayoutPlan, ProjectCard};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BriefingQuery {
    /// `grid` (default), `column` or `dashboard`.
    pub layout: Option<String>,
    /// Room shown in the dashboard detail panel.
    pub room: Option<EntityId>,
}

#[derive(Debug, Serialize)]
pub struct BriefingResponse {
    pub briefing: BriefingView,
    pub layout: LayoutPlan,
}

/// GET /api/v1/projects
///
/// Project cards, newest first.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<ProjectCard>>>> {
    let projects = state.store.list().await?;
    let cards = projects.iter().map(ProjectCard::from_project).collect();
    Ok(Json(DataResponse::new(cards)))
}

/// GET /api/v1/projects/{id}/briefing?layout=grid|column|dashboard
pub async fn briefing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<BriefingQuery>,
) -> AppResult<Json<DataResponse<BriefingResponse>>> {
    let layout: Layout = query.layout.as_deref().unwrap_or("grid").parse()?;
    let project = find_project(&state, ProjectId::new(id)).await?;

    let briefing = BriefingView::build(&project);
    let plan = layout.renderer(query.room).arrange(&briefing);
    Ok(Json(DataResponse::new(BriefingResponse {
        briefing,
        layout: plan,
    })))
}

pub(crate) async fn find_project(state: &AppState, id: ProjectId) -> AppResult<Project> {
    state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: id.to_string(),
            })
        })
}
