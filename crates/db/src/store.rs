//! The store seam and live subscriptions.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use roombrief_core::project::{NewProject, Project, ProjectPatch};
use roombrief_core::types::ProjectId;
use roombrief_events::ProjectEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::error::StoreError;

/// Document store holding one document per project.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// All projects, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Project>, StoreError>;

    async fn get(&self, id: &ProjectId) -> Result<Option<Project>, StoreError>;

    /// Insert a new document and return its store-assigned id.
    async fn create(&self, fields: NewProject) -> Result<ProjectId, StoreError>;

    /// Shallow-merge the supplied fields into an existing document.
    async fn update(&self, id: &ProjectId, patch: ProjectPatch) -> Result<(), StoreError>;

    async fn delete(&self, id: &ProjectId) -> Result<(), StoreError>;

    /// Change notices for this store's collection.
    fn changes(&self) -> broadcast::Receiver<ProjectEvent>;
}

/// Handle to a running subscription. Dropping it stops delivery.
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Deliver the full collection to `on_change` now and after every change.
///
/// Each delivery is a fresh [`ProjectStore::list`], so callers always see a
/// complete snapshot. Notices that pile up while a delivery is in progress
/// are coalesced into one refetch. A failed fetch is logged and ends the
/// subscription.
pub fn subscribe<F, Fut>(store: Arc<dyn ProjectStore>, mut on_change: F) -> Subscription
where
    F: FnMut(Vec<Project>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut changes = store.changes();
    let handle = tokio::spawn(async move {
        loop {
            match store.list().await {
                Ok(projects) => {
                    tracing::debug!(count = projects.len(), "Delivering project snapshot");
                    on_change(projects).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Project subscription failed, no further updates");
                    break;
                }
            }

            match changes.recv().await {
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Project subscription lagged, refetching");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Change bus closed, project subscription ending");
                    break;
                }
            }
            while let Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) = changes.try_recv() {}
        }
    });
    Subscription { handle }
}

/// Sort newest first, breaking ties by id so the order is total.
pub(crate) fn sort_newest_first(projects: &mut [Project]) {
    projects.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
