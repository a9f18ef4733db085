//! The shared UI session.
//!
//! [`Session`] owns the single [`AppController`] behind an async mutex. Every
//! mutation (UI action, store snapshot, finished image) runs to completion
//! under that lock and pushes the new [`SessionView`] to all WebSocket
//! clients before releasing it, so frames leave in mutation order.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::Message;
use roombrief_core::editor::DraftToken;
use roombrief_core::ingest::{ingest_images, ImageSink, ImageTarget, IngestReport, Upload};
use roombrief_core::project::Project;
use roombrief_core::types::EntityId;
use roombrief_db::{subscribe, ProjectStore, Subscription};
use tokio::sync::{mpsc, Mutex};

use crate::action::UiAction;
use crate::controller::AppController;
use crate::error::AppResult;
use crate::view::SessionView;
use crate::ws::WsManager;

#[derive(Clone)]
pub struct Session {
    controller: Arc<Mutex<AppController>>,
    ws_manager: Arc<WsManager>,
}

impl Session {
    pub fn new(store: Arc<dyn ProjectStore>, ws_manager: Arc<WsManager>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(AppController::new(store))),
            ws_manager,
        }
    }

    pub fn ws_manager(&self) -> Arc<WsManager> {
        Arc::clone(&self.ws_manager)
    }

    pub async fn view(&self) -> SessionView {
        SessionView::capture(&*self.controller.lock().await)
    }

    /// Feed the controller from the store's live subscription.
    pub fn start_subscription(&self, store: Arc<dyn ProjectStore>) -> Subscription {
        let session = self.clone();
        subscribe(store, move |projects| {
            let session = session.clone();
            async move { session.apply_snapshot(projects).await }
        })
    }

    pub async fn apply_snapshot(&self, projects: Vec<Project>) {
        let mut controller = self.controller.lock().await;
        controller.apply_snapshot(projects);
        self.push(&SessionView::capture(&controller)).await;
    }

    /// Register a WebSocket connection and queue the current view as its
    /// first frame.
    ///
    /// Runs under the controller lock, so no broadcast can slip in between
    /// registration and the first frame.
    pub async fn connect(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let controller = self.controller.lock().await;
        let rx = self.ws_manager.add(conn_id.clone()).await;
        match serde_json::to_string(&SessionView::capture(&controller)) {
            Ok(text) => {
                self.ws_manager
                    .send_to(&conn_id, Message::Text(text.into()))
                    .await;
            }
            Err(e) => tracing::error!(conn_id = %conn_id, error = %e, "Failed to serialize session view"),
        }
        rx
    }

    /// Run one UI action and return the resulting view.
    pub async fn dispatch(&self, action: UiAction) -> AppResult<SessionView> {
        let name = action.name();
        let mut controller = self.controller.lock().await;
        let result = action.apply(&mut controller).await;
        let view = SessionView::capture(&controller);
        match &result {
            Ok(changed) => tracing::debug!(action = name, changed, "UI action applied"),
            Err(e) => tracing::debug!(action = name, error = %e, "UI action rejected"),
        }
        self.push(&view).await;
        result.map(|_| view)
    }

    /// Whether the open form has a room with this id.
    pub async fn has_room(&self, room_id: EntityId) -> bool {
        let controller = self.controller.lock().await;
        controller
            .form()
            .is_some_and(|form| form.editor().room(room_id).is_some())
    }

    pub async fn item_draft_token(&self) -> Option<DraftToken> {
        self.controller.lock().await.item_draft_token()
    }

    /// Compress `uploads` concurrently and attach each result to `target`.
    ///
    /// The lock is only held while each finished image is applied, so other
    /// actions interleave with a long upload.
    pub async fn ingest(&self, target: ImageTarget, uploads: Vec<Upload>) -> IngestReport {
        let report = ingest_images(self, target, uploads).await;
        tracing::info!(
            ?target,
            added = report.added,
            failed = report.failed,
            discarded = report.discarded,
            "Image upload processed"
        );
        report
    }

    /// Callers hold the controller lock.
    async fn push(&self, view: &SessionView) {
        self.ws_manager.broadcast_json(view).await;
    }
}

#[async_trait]
impl ImageSink for Session {
    async fn apply(&self, target: ImageTarget, data_url: String) -> bool {
        let mut controller = self.controller.lock().await;
        if !controller.apply_image(target, data_url) {
            return false;
        }
        self.push(&SessionView::capture(&controller)).await;
        true
    }
}
