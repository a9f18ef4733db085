//! Ordering and late-result guarantees of the shared session.

mod common;

use std::sync::Arc;

use axum::extract::ws::Message;
use common::png_bytes;
use roombrief_api::action::UiAction;
use roombrief_api::controller::FormPatch;
use roombrief_api::session::Session;
use roombrief_api::view::ModeView;
use roombrief_api::ws::WsManager;
use roombrief_core::ingest::{ImageTarget, Upload};
use roombrief_core::room::ItemKind;
use roombrief_core::types::EntityId;
use roombrief_db::{MemoryStore, ProjectStore};
use serde_json::Value;
use tokio::sync::mpsc;

fn new_session() -> Session {
    let store: Arc<dyn ProjectStore> = Arc::new(MemoryStore::new());
    Session::new(store, Arc::new(WsManager::new()))
}

/// Everything queued on a connection, as parsed JSON text frames.
fn drain_frames(rx: &mut mpsc::UnboundedReceiver<Message>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(message) = rx.try_recv() {
        if let Message::Text(text) = message {
            frames.push(serde_json::from_str(text.as_str()).unwrap());
        }
    }
    frames
}

/// Open a create form with one room and begin a furniture entry in it.
async fn open_item_draft(session: &Session) -> EntityId {
    session.dispatch(UiAction::OpenCreate).await.unwrap();
    let view = session.dispatch(UiAction::AddRoom).await.unwrap();
    let ModeView::Form { project, .. } = view.mode else {
        panic!("expected the form to be open");
    };
    let room_id = project.rooms.iter().next().unwrap().id;
    session
        .dispatch(UiAction::BeginItem {
            room_id,
            kind: ItemKind::Furniture,
        })
        .await
        .unwrap();
    room_id
}

// ---------------------------------------------------------------------------
// Test: concurrent mutations leave every viewer on the final state
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn last_pushed_frame_matches_session_after_concurrent_actions() {
    let session = new_session();
    session.dispatch(UiAction::OpenCreate).await.unwrap();

    let mut viewers = Vec::new();
    for i in 0..50 {
        viewers.push(session.connect(format!("viewer-{i}")).await);
    }

    let mut tasks = Vec::new();
    for size in 0..64 {
        let session = session.clone();
        tasks.push(tokio::spawn(async move {
            session
                .dispatch(UiAction::UpdateForm {
                    patch: FormPatch {
                        size: Some(f64::from(size)),
                        ..Default::default()
                    },
                })
                .await
                .unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let expected = serde_json::to_value(session.view().await).unwrap();
    for rx in &mut viewers {
        let frames = drain_frames(rx);
        assert_eq!(frames.len(), 65, "initial view plus one frame per action");
        assert_eq!(frames.last(), Some(&expected));
    }
}

#[tokio::test]
async fn first_frame_is_the_view_at_connect_time() {
    let session = new_session();
    session.dispatch(UiAction::OpenCreate).await.unwrap();

    let mut rx = session.connect("late-viewer".to_string()).await;
    session.dispatch(UiAction::AddRoom).await.unwrap();

    let frames = drain_frames(&mut rx);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["mode"], "form");
    assert_eq!(frames[0]["project"]["rooms"].as_array().unwrap().len(), 0);
    assert_eq!(frames[1]["project"]["rooms"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: an image for a closed form never lands in a later one
// ---------------------------------------------------------------------------

#[tokio::test]
async fn item_image_for_a_cancelled_form_is_discarded() {
    let session = new_session();
    open_item_draft(&session).await;
    let stale = session.item_draft_token().await.unwrap();
    session.dispatch(UiAction::CancelForm).await.unwrap();

    open_item_draft(&session).await;
    let fresh = session.item_draft_token().await.unwrap();
    assert_ne!(stale, fresh);

    let report = session
        .ingest(
            ImageTarget::ItemDraft(stale),
            vec![Upload::new("late.png", png_bytes(16, 16))],
        )
        .await;

    assert_eq!(report.added, 0);
    assert_eq!(report.discarded, 1);
    let ModeView::Form { draft, .. } = session.view().await.mode else {
        panic!("expected the form to be open");
    };
    assert!(draft.unwrap().image.is_none());
}

#[tokio::test]
async fn room_image_for_a_removed_room_is_discarded() {
    let session = new_session();
    let room_id = open_item_draft(&session).await;
    session
        .dispatch(UiAction::RemoveRoom { room_id })
        .await
        .unwrap();

    let report = session
        .ingest(
            ImageTarget::Room(room_id),
            vec![Upload::new("late.png", png_bytes(16, 16))],
        )
        .await;

    assert_eq!(report.discarded, 1);
}
