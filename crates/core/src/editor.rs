//! Draft editor for a project's rooms and everything nested in them.
//!
//! [`RoomEditor`] owns the draft room list while a project form is open. All
//! operations are synchronous and keyed by local [`EntityId`]s; an unknown id
//! makes an operation a no-op rather than an error. At most one furniture or
//! decoration entry is open for editing at a time ([`ItemDraft`]).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::ingest::ImageTarget;
use crate::room::{ItemKind, LineItem, Requirement, Room, RoomPatch};
use crate::types::EntityId;
use crate::url::normalize_url;

// ---------------------------------------------------------------------------
// Line item drafts
// ---------------------------------------------------------------------------

/// Identifies one opening of the line item draft.
///
/// A fresh token is issued every time a draft is opened, so an image that
/// finishes compressing after the user closed (or reopened) the draft cannot
/// land in the wrong one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftToken(u64);

/// The furniture or decoration entry currently being filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDraft {
    pub token: DraftToken,
    pub room_id: EntityId,
    pub kind: ItemKind,
    /// The item being edited, or `None` when adding a new one.
    pub editing: Option<EntityId>,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
    pub optional: bool,
}

/// Field edits for the open draft. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDraftPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub optional: Option<bool>,
}

/// Why a draft could not be committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemDraftError {
    #[error("No furniture or decoration entry is open")]
    NoDraft,

    #[error("A name is required")]
    BlankName,

    #[error("Room {0} no longer exists")]
    RoomMissing(EntityId),
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// Source of draft tokens, shared by every editor in the process so a token
/// from a closed form never matches a draft in a later one.
static NEXT_DRAFT_TOKEN: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Default)]
pub struct RoomEditor {
    rooms: Collection<Room>,
    item_draft: Option<ItemDraft>,
}

impl RoomEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing an existing room list.
    pub fn from_rooms(rooms: Collection<Room>) -> Self {
        Self {
            rooms,
            ..Self::default()
        }
    }

    pub fn rooms(&self) -> &Collection<Room> {
        &self.rooms
    }

    pub fn into_rooms(self) -> Collection<Room> {
        self.rooms
    }

    pub fn room(&self, room_id: EntityId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn item_draft(&self) -> Option<&ItemDraft> {
        self.item_draft.as_ref()
    }

    // --- Rooms ---

    /// Append a blank room and return its id.
    pub fn add_room(&mut self) -> EntityId {
        self.rooms.push(Room::new())
    }

    /// Remove a room with everything nested in it. Closes the line item
    /// draft if it belonged to that room.
    pub fn remove_room(&mut self, room_id: EntityId) -> bool {
        let removed = self.rooms.remove(room_id).is_some();
        if removed
            && self
                .item_draft
                .as_ref()
                .is_some_and(|d| d.room_id == room_id)
        {
            self.item_draft = None;
        }
        removed
    }

    pub fn update_room(&mut self, room_id: EntityId, patch: RoomPatch) -> bool {
        match self.rooms.get_mut(room_id) {
            Some(room) => {
                patch.apply(room);
                true
            }
            None => false,
        }
    }

    // --- Requirements ---

    /// Append a requirement line. Blank text is ignored.
    pub fn add_requirement(&mut self, room_id: EntityId, text: &str) -> Option<EntityId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let room = self.rooms.get_mut(room_id)?;
        Some(room.requirements.push(Requirement {
            id: EntityId::generate(),
            text: text.to_string(),
        }))
    }

    /// Replace a requirement's text. Blank text is ignored.
    pub fn edit_requirement(
        &mut self,
        room_id: EntityId,
        requirement_id: EntityId,
        text: &str,
    ) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        match self
            .rooms
            .get_mut(room_id)
            .and_then(|room| room.requirements.get_mut(requirement_id))
        {
            Some(requirement) => {
                requirement.text = text.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove_requirement(&mut self, room_id: EntityId, requirement_id: EntityId) -> bool {
        self.rooms
            .get_mut(room_id)
            .and_then(|room| room.requirements.remove(requirement_id))
            .is_some()
    }

    // --- Furniture and decorations ---

    /// Open an empty draft for a new item in `room_id`.
    ///
    /// Replaces any draft that was already open.
    pub fn begin_item(&mut self, room_id: EntityId, kind: ItemKind) -> Option<DraftToken> {
        if !self.rooms.contains(room_id) {
            return None;
        }
        let token = self.issue_token();
        self.item_draft = Some(ItemDraft {
            token,
            room_id,
            kind,
            editing: None,
            name: String::new(),
            description: None,
            image: None,
            url: None,
            optional: false,
        });
        Some(token)
    }

    /// Open a draft pre-filled with an existing item.
    pub fn begin_edit_item(
        &mut self,
        room_id: EntityId,
        kind: ItemKind,
        item_id: EntityId,
    ) -> Option<DraftToken> {
        let item = self.rooms.get(room_id)?.items(kind).get(item_id)?.clone();
        let token = self.issue_token();
        self.item_draft = Some(ItemDraft {
            token,
            room_id,
            kind,
            editing: Some(item.id),
            name: item.name,
            description: item.description,
            image: item.image,
            url: item.url,
            optional: item.optional,
        });
        Some(token)
    }

    /// Apply field edits to the open draft. Returns `false` if none is open.
    pub fn update_item_draft(&mut self, patch: ItemDraftPatch) -> bool {
        let Some(draft) = self.item_draft.as_mut() else {
            return false;
        };
        if let Some(name) = patch.name {
            draft.name = name;
        }
        if let Some(description) = patch.description {
            draft.description = Some(description);
        }
        if let Some(url) = patch.url {
            draft.url = Some(url);
        }
        if let Some(optional) = patch.optional {
            draft.optional = optional;
        }
        true
    }

    pub fn clear_item_image(&mut self) -> bool {
        match self.item_draft.as_mut() {
            Some(draft) => {
                draft.image = None;
                true
            }
            None => false,
        }
    }

    /// Commit the open draft.
    ///
    /// A blank name is rejected and the draft stays open. Otherwise the link
    /// is normalized, blank optional text is dropped, and the draft either
    /// becomes a new item or overwrites the one being edited. An edited item
    /// that disappeared in the meantime is appended as new.
    pub fn save_item(&mut self) -> Result<EntityId, ItemDraftError> {
        let draft = self.item_draft.as_ref().ok_or(ItemDraftError::NoDraft)?;
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ItemDraftError::BlankName);
        }
        let room = self
            .rooms
            .get_mut(draft.room_id)
            .ok_or(ItemDraftError::RoomMissing(draft.room_id))?;

        let items = room.items_mut(draft.kind);
        let id = draft
            .editing
            .filter(|id| items.contains(*id))
            .unwrap_or_else(EntityId::generate);

        let item = LineItem {
            id,
            name: name.to_string(),
            description: non_blank(draft.description.as_deref()),
            image: draft.image.clone().filter(|s| !s.is_empty()),
            url: draft.url.as_deref().and_then(normalize_url),
            optional: draft.optional,
        };
        items.push(item);
        self.item_draft = None;
        Ok(id)
    }

    pub fn cancel_item(&mut self) {
        self.item_draft = None;
    }

    pub fn remove_item(&mut self, room_id: EntityId, kind: ItemKind, item_id: EntityId) -> bool {
        let removed = self
            .rooms
            .get_mut(room_id)
            .and_then(|room| room.items_mut(kind).remove(item_id))
            .is_some();
        if removed
            && self
                .item_draft
                .as_ref()
                .is_some_and(|d| d.editing == Some(item_id))
        {
            self.item_draft = None;
        }
        removed
    }

    // --- Images ---

    /// Append a compressed image to a room. Returns `false` if the room is gone.
    pub fn attach_room_image(&mut self, room_id: EntityId, data_url: String) -> bool {
        match self.rooms.get_mut(room_id) {
            Some(room) => {
                room.images.push(data_url);
                true
            }
            None => false,
        }
    }

    /// Set the open draft's image, provided it is still the draft identified by `token`.
    pub fn attach_item_image(&mut self, token: DraftToken, data_url: String) -> bool {
        match self.item_draft.as_mut() {
            Some(draft) if draft.token == token => {
                draft.image = Some(data_url);
                true
            }
            _ => false,
        }
    }

    /// Route a finished image to its target, if the target still exists.
    pub fn apply_image(&mut self, target: ImageTarget, data_url: String) -> bool {
        match target {
            ImageTarget::Room(room_id) => self.attach_room_image(room_id, data_url),
            ImageTarget::ItemDraft(token) => self.attach_item_image(token, data_url),
        }
    }

    pub fn remove_room_image(&mut self, room_id: EntityId, index: usize) -> bool {
        match self.rooms.get_mut(room_id) {
            Some(room) if index < room.images.len() => {
                room.images.remove(index);
                true
            }
            _ => false,
        }
    }

    fn issue_token(&mut self) -> DraftToken {
        DraftToken(NEXT_DRAFT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
