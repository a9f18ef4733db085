//! Postgres [`ProjectStore`] backend.
//!
//! Each project is one row of the `projects` table with its editable fields
//! in a JSONB `document` column. Change notices reach the bus through the
//! table trigger and [`ChangeListener`](roombrief_events::ChangeListener), so
//! this store never publishes directly.

use std::sync::Arc;

use async_trait::async_trait;
use roombrief_core::project::{NewProject, Project, ProjectPatch};
use roombrief_core::types::{ProjectId, Timestamp};
use roombrief_events::{EventBus, ProjectEvent};
use serde_json::Value;
use sqlx::FromRow;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::document::{new_document, patch_document, read_document};
use crate::error::StoreError;
use crate::store::ProjectStore;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, document, created_at";

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: Uuid,
    document: Value,
    created_at: Timestamp,
}

impl ProjectRow {
    fn into_project(self) -> Result<Project, StoreError> {
        read_document(
            ProjectId::new(self.id.to_string()),
            self.created_at,
            self.document,
        )
    }
}

pub struct PgProjectStore {
    pool: DbPool,
    bus: Arc<EventBus>,
}

impl PgProjectStore {
    /// `bus` must be fed by a running change listener for subscriptions to
    /// see updates.
    pub fn new(pool: DbPool, bus: Arc<EventBus>) -> Self {
        Self { pool, bus }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Ids are UUIDs in this backend; anything else cannot name a row.
fn parse_id(id: &ProjectId) -> Option<Uuid> {
    id.as_str().parse().ok()
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, ProjectRow>(&query)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ProjectRow::into_project)
            .collect()
    }

    async fn get(&self, id: &ProjectId) -> Result<Option<Project>, StoreError> {
        let Some(uuid) = parse_id(id) else {
            return Ok(None);
        };
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?
            .map(ProjectRow::into_project)
            .transpose()
    }

    async fn create(&self, fields: NewProject) -> Result<ProjectId, StoreError> {
        fields.validate()?;
        let document = new_document(&fields)?;
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO projects (id, document) VALUES ($1, $2) RETURNING id",
        )
        .bind(Uuid::now_v7())
        .bind(&document)
        .fetch_one(&self.pool)
        .await?;

        let id = ProjectId::new(id.to_string());
        tracing::info!(project_id = %id, "Project created");
        Ok(id)
    }

    async fn update(&self, id: &ProjectId, patch: ProjectPatch) -> Result<(), StoreError> {
        patch.validate()?;
        let uuid = parse_id(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let fields = patch_document(&patch)?;

        let result = sqlx::query(
            "UPDATE projects SET document = document || $2::jsonb, updated_at = now()
             WHERE id = $1",
        )
        .bind(uuid)
        .bind(&fields)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.clone()));
        }
        tracing::info!(project_id = %id, "Project updated");
        Ok(())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), StoreError> {
        let uuid = parse_id(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.clone()));
        }
        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<ProjectEvent> {
        self.bus.subscribe()
    }
}
