//! In-process [`ProjectStore`] backend.
//!
//! Documents are kept in the same stripped JSON form the Postgres backend
//! writes, so reads go through the same decoding path.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use roombrief_core::project::{NewProject, Project, ProjectPatch};
use roombrief_core::types::{ProjectId, Timestamp};
use roombrief_events::{EventBus, ProjectEvent};
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::document::{merge_document, new_document, patch_document, read_document};
use crate::error::StoreError;
use crate::store::{sort_newest_first, ProjectStore};

struct StoredDocument {
    created_at: Timestamp,
    document: Value,
}

pub struct MemoryStore {
    documents: RwLock<HashMap<ProjectId, StoredDocument>>,
    bus: Arc<EventBus>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_bus(Arc::new(EventBus::default()))
    }

    /// Publish change notices on an existing bus.
    pub fn with_bus(bus: Arc<EventBus>) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            bus,
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        let documents = self.documents.read().await;
        let mut projects = documents
            .iter()
            .map(|(id, stored)| read_document(id.clone(), stored.created_at, stored.document.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        sort_newest_first(&mut projects);
        Ok(projects)
    }

    async fn get(&self, id: &ProjectId) -> Result<Option<Project>, StoreError> {
        let documents = self.documents.read().await;
        documents
            .get(id)
            .map(|stored| read_document(id.clone(), stored.created_at, stored.document.clone()))
            .transpose()
    }

    async fn create(&self, fields: NewProject) -> Result<ProjectId, StoreError> {
        fields.validate()?;
        let document = new_document(&fields)?;
        let id = ProjectId::new(Uuid::now_v7().to_string());

        self.documents.write().await.insert(
            id.clone(),
            StoredDocument {
                created_at: Utc::now(),
                document,
            },
        );
        tracing::info!(project_id = %id, "Project created");
        self.bus.publish(ProjectEvent::created(id.clone()));
        Ok(id)
    }

    async fn update(&self, id: &ProjectId, patch: ProjectPatch) -> Result<(), StoreError> {
        patch.validate()?;
        let fields = patch_document(&patch)?;
        {
            let mut documents = self.documents.write().await;
            let stored = documents
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            merge_document(&mut stored.document, fields);
        }
        tracing::info!(project_id = %id, "Project updated");
        self.bus.publish(ProjectEvent::updated(id.clone()));
        Ok(())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        tracing::info!(project_id = %id, "Project deleted");
        self.bus.publish(ProjectEvent::deleted(id.clone()));
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<ProjectEvent> {
        self.bus.subscribe()
    }
}
