//! Serializable snapshot of the controller for the browser shell.

use roombrief_core::editor::ItemDraft;
use roombrief_core::project::{NewProject, Project, ProjectStatus};
use roombrief_core::room::{Floor, Priority, RoomType};
use roombrief_core::types::ProjectId;
use roombrief_core::view::{BriefingView, ProjectCard};
use serde::Serialize;

use crate::controller::{AppController, ViewMode};

/// Everything needed to render the current screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub loading: bool,
    #[serde(flatten)]
    pub mode: ModeView,
    pub projects: Vec<ProjectCard>,
    pub banner: Option<String>,
    pub pending_delete: Option<PendingDelete>,
    pub preview_image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeView {
    List,
    Form {
        /// Id of the project being edited; `None` for a new project.
        editing: Option<ProjectId>,
        project: NewProject,
        draft: Option<ItemDraft>,
        options: FormOptions,
    },
    Detail {
        id: ProjectId,
        /// `None` until the store's snapshot includes the project.
        project: Option<Project>,
        briefing: Option<BriefingView>,
    },
}

/// Choices offered by the form's selectors, in display order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOptions {
    pub statuses: Vec<SelectOption<ProjectStatus>>,
    pub room_types: Vec<SelectOption<RoomType>>,
    pub floors: Vec<SelectOption<Floor>>,
    pub priorities: Vec<SelectOption<Priority>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectOption<T> {
    pub value: T,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl<T> SelectOption<T> {
    fn new(value: T, label: &'static str) -> Self {
        Self {
            value,
            label,
            description: None,
        }
    }
}

impl FormOptions {
    pub fn build() -> Self {
        Self {
            statuses: ProjectStatus::ALL
                .into_iter()
                .map(|s| SelectOption::new(s, s.label()))
                .collect(),
            room_types: RoomType::ALL
                .into_iter()
                .map(|t| SelectOption::new(t, t.label()))
                .collect(),
            floors: Floor::ALL
                .into_iter()
                .map(|f| SelectOption::new(f, f.code()))
                .collect(),
            priorities: Priority::ALL
                .into_iter()
                .map(|p| SelectOption {
                    description: Some(p.description()),
                    ..SelectOption::new(p, p.as_str())
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingDelete {
    pub id: ProjectId,
    pub title: String,
}

impl SessionView {
    pub fn capture(controller: &AppController) -> Self {
        let mode = match controller.mode() {
            ViewMode::List => ModeView::List,
            ViewMode::Form(form) => ModeView::Form {
                editing: form.editing().cloned(),
                project: form.fields(),
                draft: form.editor().item_draft().cloned(),
                options: FormOptions::build(),
            },
            ViewMode::Detail(id) => {
                let project = controller.project(id).cloned();
                ModeView::Detail {
                    id: id.clone(),
                    briefing: project.as_ref().map(BriefingView::build),
                    project,
                }
            }
        };

        let pending_delete = controller.pending_delete().and_then(|id| {
            controller.project(id).map(|project| PendingDelete {
                id: id.clone(),
                title: project.title.clone(),
            })
        });

        Self {
            loading: controller.is_loading(),
            mode,
            projects: controller
                .projects()
                .iter()
                .map(ProjectCard::from_project)
                .collect(),
            banner: controller.banner().map(str::to_string),
            pending_delete,
            preview_image: controller.preview().map(str::to_string),
        }
    }
}
