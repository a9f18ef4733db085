//! Project briefs: the top-level document persisted in the store.

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::error::CoreError;
use crate::room::Room;
use crate::types::{ProjectId, Timestamp};

/// Floor area pre-filled on a new project form.
pub const DEFAULT_PROJECT_SIZE: f64 = 30.0;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    #[serde(alias = "PLANNING")]
    Planning,
    #[serde(alias = "DESIGNING")]
    Designing,
    #[serde(alias = "CONSTRUCTION")]
    Construction,
    #[serde(alias = "COMPLETED")]
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        Self::Planning,
        Self::Designing,
        Self::Construction,
        Self::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Designing => "designing",
            Self::Construction => "construction",
            Self::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Designing => "Designing",
            Self::Construction => "Under Construction",
            Self::Completed => "Completed",
        }
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A stored project brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub style_preference: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub rooms: Collection<Room>,
    pub created_at: Timestamp,
}

impl Project {
    /// The editable fields, as loaded into the form when editing.
    pub fn fields(&self) -> NewProject {
        NewProject {
            title: self.title.clone(),
            client_name: self.client_name.clone(),
            location: self.location.clone(),
            size: self.size,
            style_preference: self.style_preference.clone(),
            status: self.status,
            rooms: self.rooms.clone(),
        }
    }

    /// Assemble a stored project from its editable fields.
    pub fn from_fields(id: ProjectId, created_at: Timestamp, fields: NewProject) -> Self {
        Self {
            id,
            title: fields.title,
            client_name: fields.client_name,
            location: fields.location,
            size: fields.size,
            style_preference: fields.style_preference,
            status: fields.status,
            rooms: fields.rooms,
            created_at,
        }
    }
}

/// Everything the user fills in for a project; the payload of a create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_size")]
    pub size: f64,
    #[serde(default)]
    pub style_preference: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub rooms: Collection<Room>,
}

fn default_size() -> f64 {
    DEFAULT_PROJECT_SIZE
}

impl Default for NewProject {
    fn default() -> Self {
        Self {
            title: String::new(),
            client_name: String::new(),
            location: String::new(),
            size: DEFAULT_PROJECT_SIZE,
            style_preference: String::new(),
            status: ProjectStatus::default(),
            rooms: Collection::new(),
        }
    }
}

impl NewProject {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_title(&self.title)?;
        validate_size(self.size)
    }
}

/// Partial update. Only `Some` fields are written; `rooms` replaces the whole
/// room list when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_preference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<Collection<Room>>,
}

impl ProjectPatch {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(size) = self.size {
            validate_size(size)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, project: &mut Project) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(client_name) = self.client_name {
            project.client_name = client_name;
        }
        if let Some(location) = self.location {
            project.location = location;
        }
        if let Some(size) = self.size {
            project.size = size;
        }
        if let Some(style_preference) = self.style_preference {
            project.style_preference = style_preference;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(rooms) = self.rooms {
            project.rooms = rooms;
        }
    }
}

/// A full-form save overwrites every editable field.
impl From<NewProject> for ProjectPatch {
    fn from(fields: NewProject) -> Self {
        Self {
            title: Some(fields.title),
            client_name: Some(fields.client_name),
            location: Some(fields.location),
            size: Some(fields.size),
            style_preference: Some(fields.style_preference),
            status: Some(fields.status),
            rooms: Some(fields.rooms),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Project title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_size(size: f64) -> Result<(), CoreError> {
    if !size.is_finite() || size < 0.0 {
        return Err(CoreError::Validation(format!(
            "Project size must be a non-negative number, got {size}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_defaults() {
        let fields = NewProject::default();
        assert_eq!(fields.size, DEFAULT_PROJECT_SIZE);
        assert_eq!(fields.status, ProjectStatus::Planning);
        assert!(fields.rooms.is_empty());
    }

    #[test]
    fn blank_title_fails_validation() {
        let fields = NewProject {
            title: "  ".into(),
            ..Default::default()
        };
        assert!(fields.validate().is_err());
    }

    #[test]
    fn negative_or_nan_size_fails_validation() {
        assert!(validate_size(-1.0).is_err());
        assert!(validate_size(f64::NAN).is_err());
        assert!(validate_size(0.0).is_ok());
    }

    #[test]
    fn status_serializes_snake_case_and_accepts_upper_alias() {
        assert_eq!(
            serde_json::to_value(ProjectStatus::Construction).unwrap(),
            "construction"
        );
        let parsed: ProjectStatus = serde_json::from_value(serde_json::json!("PLANNING")).unwrap();
        assert_eq!(parsed, ProjectStatus::Planning);
    }

    #[test]
    fn document_uses_camel_case_keys() {
        let project = Project::from_fields(
            ProjectId::new("p1"),
            chrono::Utc::now(),
            NewProject {
                title: "Loft".into(),
                client_name: "Lee".into(),
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["clientName"], "Lee");
        assert_eq!(json["stylePreference"], "");
        assert!(json["createdAt"].is_string());
        assert!(json["rooms"].is_array());
    }

    #[test]
    fn patch_applies_only_supplied_fields() {
        let mut project = Project::from_fields(
            ProjectId::new("p1"),
            chrono::Utc::now(),
            NewProject {
                title: "Old".into(),
                location: "Taipei".into(),
                ..Default::default()
            },
        );
        let patch = ProjectPatch {
            title: Some("New".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut project);
        assert_eq!(project.title, "New");
        assert_eq!(project.location, "Taipei");
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let json = serde_json::to_value(ProjectPatch::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
