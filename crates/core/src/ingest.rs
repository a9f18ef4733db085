//! Concurrent ingestion of uploaded images.
//!
//! Every file of a multi-file upload is compressed as an independent task.
//! Results are handed to an [`ImageSink`] as they complete, in whatever order
//! that happens. The sink appends to the target's current image list and
//! checks that the target still exists, so a late result for a room that was
//! removed (or a line item draft that was closed) is dropped instead of
//! resurrecting stale state.

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::editor::{DraftToken, RoomEditor};
use crate::imaging::compress_async;
use crate::types::EntityId;

/// Where a finished image should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ImageTarget {
    /// Append to a room's reference images.
    Room(EntityId),
    /// Set as the image of the open furniture/decoration draft.
    ItemDraft(DraftToken),
}

/// Receives compressed images.
#[async_trait]
pub trait ImageSink: Send + Sync {
    /// Apply a finished image. Returns `false` if the target no longer exists.
    async fn apply(&self, target: ImageTarget, data_url: String) -> bool;
}

#[async_trait]
impl ImageSink for Mutex<RoomEditor> {
    async fn apply(&self, target: ImageTarget, data_url: String) -> bool {
        self.lock().await.apply_image(target, data_url)
    }
}

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            bytes,
        }
    }
}

/// Outcome of one upload action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Images stored on their target.
    pub added: usize,
    /// Files that could not be decoded or encoded.
    pub failed: usize,
    /// Images that finished after their target went away.
    pub discarded: usize,
}

/// Compress all `uploads` concurrently and apply each result to `target`.
///
/// Failures are logged and counted; they never abort the other files.
pub async fn ingest_images<S>(sink: &S, target: ImageTarget, uploads: Vec<Upload>) -> IngestReport
where
    S: ImageSink + ?Sized,
{
    let mut pending: FuturesUnordered<_> = uploads
        .into_iter()
        .map(|upload| async move {
            let file_name = upload.file_name;
            (file_name, compress_async(upload.bytes).await)
        })
        .collect();

    let mut report = IngestReport::default();
    while let Some((file_name, result)) = pending.next().await {
        match result {
            Ok(image) => {
                if sink.apply(target, image.data_url).await {
                    report.added += 1;
                } else {
                    tracing::debug!(
                        ?target,
                        file_name = file_name.as_deref().unwrap_or("<unnamed>"),
                        "Image target gone, dropping compressed image"
                    );
                    report.discarded += 1;
                }
            }
            Err(e) => {
                tracing::warn!(
                    ?target,
                    file_name = file_name.as_deref().unwrap_or("<unnamed>"),
                    error = %e,
                    "Image compression failed, skipping file"
                );
                report.failed += 1;
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::imaging::tests::png_bytes;
    use crate::imaging::DATA_URL_PREFIX;
    use crate::room::ItemKind;

    fn uploads(sizes: &[(u32, u32)]) -> Vec<Upload> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, (w, h))| Upload::new(format!("img{i}.png"), png_bytes(*w, *h)))
            .collect()
    }

    #[tokio::test]
    async fn three_files_yield_three_images() {
        let mut editor = RoomEditor::new();
        let room_id = editor.add_room();
        let editor = Mutex::new(editor);

        let report = ingest_images(
            &editor,
            ImageTarget::Room(room_id),
            uploads(&[(2400, 1800), (16, 16), (900, 300)]),
        )
        .await;

        assert_eq!(
            report,
            IngestReport {
                added: 3,
                failed: 0,
                discarded: 0
            }
        );
        let guard = editor.lock().await;
        let images = &guard.room(room_id).unwrap().images;
        assert_eq!(images.len(), 3);
        assert!(images.iter().all(|i| i.starts_with(DATA_URL_PREFIX)));
    }

    #[tokio::test]
    async fn interleaved_upload_actions_do_not_clobber_each_other() {
        let mut editor = RoomEditor::new();
        let room_id = editor.add_room();
        editor.attach_room_image(room_id, "existing".into());
        let editor = Arc::new(Mutex::new(editor));

        let target = ImageTarget::Room(room_id);
        let (a, b, c) = tokio::join!(
            ingest_images(&*editor, target, uploads(&[(1200, 1200)])),
            ingest_images(&*editor, target, uploads(&[(10, 10)])),
            ingest_images(&*editor, target, uploads(&[(500, 700)])),
        );

        assert_eq!(a.added + b.added + c.added, 3);
        let guard = editor.lock().await;
        let images = &guard.room(room_id).unwrap().images;
        assert_eq!(images.len(), 4);
        assert_eq!(images[0], "existing");
    }

    #[tokio::test]
    async fn undecodable_file_is_skipped_and_counted() {
        let mut editor = RoomEditor::new();
        let room_id = editor.add_room();
        let editor = Mutex::new(editor);

        let mut files = uploads(&[(40, 40)]);
        files.push(Upload::new("notes.txt", b"not an image".to_vec()));

        let report = ingest_images(&editor, ImageTarget::Room(room_id), files).await;

        assert_eq!(report.added, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(editor.lock().await.room(room_id).unwrap().images.len(), 1);
    }

    /// Sink that removes the room before the image arrives.
    struct VanishingRoom {
        editor: Mutex<RoomEditor>,
        room_id: EntityId,
    }

    #[async_trait]
    impl ImageSink for VanishingRoom {
        async fn apply(&self, target: ImageTarget, data_url: String) -> bool {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let mut editor = self.editor.lock().await;
            editor.remove_room(self.room_id);
            editor.apply_image(target, data_url)
        }
    }

    #[tokio::test]
    async fn late_result_for_removed_room_is_discarded() {
        let mut editor = RoomEditor::new();
        let room_id = editor.add_room();
        let sibling = editor.add_room();
        let sink = VanishingRoom {
            editor: Mutex::new(editor),
            room_id,
        };

        let report = ingest_images(&sink, ImageTarget::Room(room_id), uploads(&[(30, 30)])).await;

        assert_eq!(report.discarded, 1);
        assert_eq!(report.added, 0);
        let editor = sink.editor.lock().await;
        assert!(editor.room(room_id).is_none());
        assert!(editor.room(sibling).unwrap().images.is_empty());
    }

    #[tokio::test]
    async fn draft_image_lands_on_matching_draft_only() {
        let mut editor = RoomEditor::new();
        let room_id = editor.add_room();
        let token = editor.begin_item(room_id, ItemKind::Furniture).unwrap();
        let editor = Mutex::new(editor);

        let report = ingest_images(&editor, ImageTarget::ItemDraft(token), uploads(&[(64, 64)])).await;
        assert_eq!(report.added, 1);
        assert!(editor.lock().await.item_draft().unwrap().image.is_some());

        editor.lock().await.cancel_item();
        let report = ingest_images(&editor, ImageTarget::ItemDraft(token), uploads(&[(64, 64)])).await;
        assert_eq!(report.discarded, 1);
    }
}
