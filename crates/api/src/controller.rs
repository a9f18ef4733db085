//! Application state controller.
//!
//! [`AppController`] holds everything the browser shell renders: the project
//! list delivered by the store subscription, the current [`ViewMode`], the
//! open project form, a pending delete confirmation, an error banner and an
//! image preview. Exactly one mode is active at a time.

use std::sync::Arc;

use roombrief_core::editor::{DraftToken, RoomEditor};
use roombrief_core::ingest::ImageTarget;
use roombrief_core::project::{NewProject, Project, ProjectPatch, ProjectStatus};
use roombrief_core::types::ProjectId;
use roombrief_db::ProjectStore;
use serde::{Deserialize, Serialize};

pub const SAVE_FAILED_MESSAGE: &str = "Failed to save the project, please try again later.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete the project, please try again later.";

// ---------------------------------------------------------------------------
// Project form
// ---------------------------------------------------------------------------

/// Edits to the project-level form fields. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub style_preference: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

/// The create/edit form: project fields plus the room editor.
#[derive(Debug, Clone)]
pub struct ProjectForm {
    editing: Option<ProjectId>,
    title: String,
    client_name: String,
    location: String,
    size: f64,
    style_preference: String,
    status: ProjectStatus,
    editor: RoomEditor,
}

impl ProjectForm {
    /// An empty create form.
    pub fn blank() -> Self {
        Self::from_fields(None, NewProject::default())
    }

    /// An edit form pre-filled from a stored project.
    pub fn for_project(project: &Project) -> Self {
        Self::from_fields(Some(project.id.clone()), project.fields())
    }

    fn from_fields(editing: Option<ProjectId>, fields: NewProject) -> Self {
        Self {
            editing,
            title: fields.title,
            client_name: fields.client_name,
            location: fields.location,
            size: fields.size,
            style_preference: fields.style_preference,
            status: fields.status,
            editor: RoomEditor::from_rooms(fields.rooms),
        }
    }

    /// The project being edited, or `None` for a create form.
    pub fn editing(&self) -> Option<&ProjectId> {
        self.editing.as_ref()
    }

    pub fn editor(&self) -> &RoomEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut RoomEditor {
        &mut self.editor
    }

    pub fn apply(&mut self, patch: FormPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(client_name) = patch.client_name {
            self.client_name = client_name;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(style_preference) = patch.style_preference {
            self.style_preference = style_preference;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    /// Snapshot of everything the form would save.
    pub fn fields(&self) -> NewProject {
        NewProject {
            title: self.title.clone(),
            client_name: self.client_name.clone(),
            location: self.location.clone(),
            size: self.size,
            style_preference: self.style_preference.clone(),
            status: self.status,
            rooms: self.editor.rooms().clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum ViewMode {
    List,
    Form(Box<ProjectForm>),
    Detail(ProjectId),
}

pub struct AppController {
    store: Arc<dyn ProjectStore>,
    projects: Vec<Project>,
    loading: bool,
    mode: ViewMode,
    pending_delete: Option<ProjectId>,
    banner: Option<String>,
    preview: Option<String>,
}

impl AppController {
    /// Starts in the list view, loading until the first snapshot arrives.
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self {
            store,
            projects: Vec::new(),
            loading: true,
            mode: ViewMode::List,
            pending_delete: None,
            banner: None,
            preview: None,
        }
    }

    pub fn store(&self) -> &Arc<dyn ProjectStore> {
        &self.store
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    /// The project shown in the detail view, once the list has it.
    pub fn selected_project(&self) -> Option<&Project> {
        match &self.mode {
            ViewMode::Detail(id) => self.project(id),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&ProjectForm> {
        match &self.mode {
            ViewMode::Form(form) => Some(&**form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut ProjectForm> {
        match &mut self.mode {
            ViewMode::Form(form) => Some(&mut **form),
            _ => None,
        }
    }

    /// The open form's room editor, if a form is open.
    pub fn editor_mut(&mut self) -> Option<&mut RoomEditor> {
        self.form_mut().map(ProjectForm::editor_mut)
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn pending_delete(&self) -> Option<&ProjectId> {
        self.pending_delete.as_ref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    // -- store events --------------------------------------------------------

    /// Replace the project list with a fresh snapshot from the subscription.
    ///
    /// A detail view whose project was in the previous list but is missing
    /// from this one returns to the list. A project that was never listed
    /// (just created, snapshot still in flight) keeps its detail view.
    pub fn apply_snapshot(&mut self, projects: Vec<Project>) {
        let vanished = |id: &ProjectId, old: &[Project]| {
            old.iter().any(|p| &p.id == id) && !projects.iter().any(|p| &p.id == id)
        };

        if let ViewMode::Detail(id) = &self.mode {
            if vanished(id, &self.projects) {
                tracing::info!(project_id = %id, "Selected project was removed, returning to list");
                self.mode = ViewMode::List;
            }
        }
        if let Some(id) = &self.pending_delete {
            if vanished(id, &self.projects) {
                self.pending_delete = None;
            }
        }

        self.projects = projects;
        self.loading = false;
    }

    // -- navigation ----------------------------------------------------------

    /// Open a blank create form. Ignored while a form is already open.
    pub fn open_create(&mut self) -> bool {
        if self.form().is_some() {
            return false;
        }
        self.mode = ViewMode::Form(Box::new(ProjectForm::blank()));
        true
    }

    /// Open the edit form for the project in the detail view.
    pub fn open_edit(&mut self) -> bool {
        let Some(project) = self.selected_project() else {
            return false;
        };
        let form = ProjectForm::for_project(project);
        self.mode = ViewMode::Form(Box::new(form));
        true
    }

    /// Show a listed project's detail view. Ignored while a form is open.
    pub fn select(&mut self, id: &ProjectId) -> bool {
        if self.form().is_some() || self.project(id).is_none() {
            return false;
        }
        self.mode = ViewMode::Detail(id.clone());
        true
    }

    /// Return to the list from anywhere, discarding an open form.
    pub fn back_to_list(&mut self) {
        self.mode = ViewMode::List;
    }

    /// Close the form: an edit returns to its project, a create to the list.
    pub fn cancel_form(&mut self) -> bool {
        let ViewMode::Form(form) = &self.mode else {
            return false;
        };
        self.mode = match form.editing() {
            Some(id) => ViewMode::Detail(id.clone()),
            None => ViewMode::List,
        };
        true
    }

    pub fn update_form(&mut self, patch: FormPatch) -> bool {
        match self.form_mut() {
            Some(form) => {
                form.apply(patch);
                true
            }
            None => false,
        }
    }

    // -- images --------------------------------------------------------------

    /// Deliver a compressed image to the open form's editor.
    pub fn apply_image(&mut self, target: ImageTarget, data_url: String) -> bool {
        match self.editor_mut() {
            Some(editor) => editor.apply_image(target, data_url),
            None => false,
        }
    }

    /// Token of the open line item draft, if any.
    pub fn item_draft_token(&self) -> Option<DraftToken> {
        self.form()
            .and_then(|form| form.editor().item_draft())
            .map(|draft| draft.token)
    }

    pub fn open_preview(&mut self, image: String) {
        self.preview = Some(image);
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    // -- persistence ---------------------------------------------------------

    /// Save the open form.
    ///
    /// A blank title is a no-op. A create switches to the new project's
    /// detail view; an update returns to the edited project's detail view.
    /// On failure the form stays open and the banner is set.
    pub async fn save(&mut self) -> Option<ProjectId> {
        let form = self.form()?;
        if form.title.trim().is_empty() {
            return None;
        }
        let editing = form.editing().cloned();
        let fields = form.fields();

        let result = match &editing {
            Some(id) => self
                .store
                .update(id, ProjectPatch::from(fields))
                .await
                .map(|()| id.clone()),
            None => self.store.create(fields).await,
        };

        match result {
            Ok(id) => {
                tracing::info!(project_id = %id, updated = editing.is_some(), "Project saved");
                self.mode = ViewMode::Detail(id.clone());
                Some(id)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save project");
                self.banner = Some(SAVE_FAILED_MESSAGE.to_string());
                None
            }
        }
    }

    /// Ask for confirmation before deleting a listed project.
    pub fn request_delete(&mut self, id: &ProjectId) -> bool {
        if self.project(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id.clone());
        true
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the project awaiting confirmation.
    ///
    /// Returns to the list if it was selected. The pending delete is cleared
    /// whether or not the store call succeeds.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        match self.store.delete(&id).await {
            Ok(()) => {
                if matches!(&self.mode, ViewMode::Detail(selected) if *selected == id) {
                    self.mode = ViewMode::List;
                }
                true
            }
            Err(e) => {
                tracing::error!(project_id = %id, error = %e, "Failed to delete project");
                self.banner = Some(DELETE_FAILED_MESSAGE.to_string());
                false
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.banner = None;
    }
}
