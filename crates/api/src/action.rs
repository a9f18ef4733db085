//! UI actions posted by the browser shell.
//!
//! Each [`UiAction`] maps onto one controller or editor operation. Actions
//! that reference a missing id, or need a form when none is open, are
//! no-ops. Only a rejected line item save is reported as an error.

use roombrief_core::editor::{ItemDraftError, ItemDraftPatch};
use roombrief_core::error::CoreError;
use roombrief_core::room::{ItemKind, RoomPatch};
use roombrief_core::types::{EntityId, ProjectId};
use serde::Deserialize;

use crate::controller::{AppController, FormPatch};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiAction {
    // -- navigation --
    OpenCreate,
    OpenEdit,
    Select { project_id: ProjectId },
    BackToList,
    CancelForm,
    UpdateForm { patch: FormPatch },
    Save,

    // -- deletion --
    RequestDelete { project_id: ProjectId },
    CancelDelete,
    ConfirmDelete,

    // -- banner and preview --
    DismissError,
    PreviewImage { image: String },
    ClosePreview,

    // -- rooms --
    AddRoom,
    RemoveRoom { room_id: EntityId },
    UpdateRoom { room_id: EntityId, patch: RoomPatch },
    RemoveRoomImage { room_id: EntityId, index: usize },

    // -- requirements --
    AddRequirement { room_id: EntityId, text: String },
    EditRequirement {
        room_id: EntityId,
        requirement_id: EntityId,
        text: String,
    },
    RemoveRequirement { room_id: EntityId, requirement_id: EntityId },

    // -- furniture and decorations --
    BeginItem { room_id: EntityId, kind: ItemKind },
    BeginEditItem {
        room_id: EntityId,
        kind: ItemKind,
        item_id: EntityId,
    },
    UpdateItemDraft { patch: ItemDraftPatch },
    ClearItemImage,
    SaveItem,
    CancelItem,
    RemoveItem {
        room_id: EntityId,
        kind: ItemKind,
        item_id: EntityId,
    },
}

impl UiAction {
    /// Action name as it appears in the `action` tag, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenCreate => "open_create",
            Self::OpenEdit => "open_edit",
            Self::Select { .. } => "select",
            Self::BackToList => "back_to_list",
            Self::CancelForm => "cancel_form",
            Self::UpdateForm { .. } => "update_form",
            Self::Save => "save",
            Self::RequestDelete { .. } => "request_delete",
            Self::CancelDelete => "cancel_delete",
            Self::ConfirmDelete => "confirm_delete",
            Self::DismissError => "dismiss_error",
            Self::PreviewImage { .. } => "preview_image",
            Self::ClosePreview => "close_preview",
            Self::AddRoom => "add_room",
            Self::RemoveRoom { .. } => "remove_room",
            Self::UpdateRoom { .. } => "update_room",
            Self::RemoveRoomImage { .. } => "remove_room_image",
            Self::AddRequirement { .. } => "add_requirement",
            Self::EditRequirement { .. } => "edit_requirement",
            Self::RemoveRequirement { .. } => "remove_requirement",
            Self::BeginItem { .. } => "begin_item",
            Self::BeginEditItem { .. } => "begin_edit_item",
            Self::UpdateItemDraft { .. } => "update_item_draft",
            Self::ClearItemImage => "clear_item_image",
            Self::SaveItem => "save_item",
            Self::CancelItem => "cancel_item",
            Self::RemoveItem { .. } => "remove_item",
        }
    }

    /// Apply the action. Returns whether any state changed.
    pub async fn apply(self, controller: &mut AppController) -> AppResult<bool> {
        let changed = match self {
            Self::OpenCreate => controller.open_create(),
            Self::OpenEdit => controller.open_edit(),
            Self::Select { project_id } => controller.select(&project_id),
            Self::BackToList => {
                controller.back_to_list();
                true
            }
            Self::CancelForm => controller.cancel_form(),
            Self::UpdateForm { patch } => controller.update_form(patch),
            Self::Save => controller.save().await.is_some(),
            Self::RequestDelete { project_id } => controller.request_delete(&project_id),
            Self::CancelDelete => {
                controller.cancel_delete();
                true
            }
            Self::ConfirmDelete => controller.confirm_delete().await,
            Self::DismissError => {
                controller.dismiss_error();
                true
            }
            Self::PreviewImage { image } => {
                controller.open_preview(image);
                true
            }
            Self::ClosePreview => {
                controller.close_preview();
                true
            }
            editor_action => return apply_to_editor(editor_action, controller),
        };
        Ok(changed)
    }
}

fn apply_to_editor(action: UiAction, controller: &mut AppController) -> AppResult<bool> {
    let Some(editor) = controller.editor_mut() else {
        return Ok(false);
    };
    let changed = match action {
        UiAction::AddRoom => {
            editor.add_room();
            true
        }
        UiAction::RemoveRoom { room_id } => editor.remove_room(room_id),
        UiAction::UpdateRoom { room_id, patch } => editor.update_room(room_id, patch),
        UiAction::RemoveRoomImage { room_id, index } => editor.remove_room_image(room_id, index),
        UiAction::AddRequirement { room_id, text } => {
            editor.add_requirement(room_id, &text).is_some()
        }
        UiAction::EditRequirement {
            room_id,
            requirement_id,
            text,
        } => editor.edit_requirement(room_id, requirement_id, &text),
        UiAction::RemoveRequirement {
            room_id,
            requirement_id,
        } => editor.remove_requirement(room_id, requirement_id),
        UiAction::BeginItem { room_id, kind } => editor.begin_item(room_id, kind).is_some(),
        UiAction::BeginEditItem {
            room_id,
            kind,
            item_id,
        } => editor.begin_edit_item(room_id, kind, item_id).is_some(),
        UiAction::UpdateItemDraft { patch } => editor.update_item_draft(patch),
        UiAction::ClearItemImage => editor.clear_item_image(),
        UiAction::SaveItem => match editor.save_item() {
            Ok(_) => true,
            Err(ItemDraftError::NoDraft) => false,
            Err(e) => return Err(AppError::Core(CoreError::Validation(e.to_string()))),
        },
        UiAction::CancelItem => {
            let open = editor.item_draft().is_some();
            editor.cancel_item();
            open
        }
        UiAction::RemoveItem {
            room_id,
            kind,
            item_id,
        } => editor.remove_item(room_id, kind, item_id),
        other => {
            tracing::warn!(action = other.name(), "Action is not an editor operation");
            false
        }
    };
    Ok(changed)
}
