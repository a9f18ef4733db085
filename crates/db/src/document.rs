//! Conversion between [`Project`] values and stored JSON documents.
//!
//! A stored document holds the editable fields only (`title`, `clientName`,
//! `location`, `size`, `stylePreference`, `status`, `rooms`). The id and
//! creation time live beside it. Documents never contain JSON `null`s.

use roombrief_core::project::{NewProject, Project, ProjectPatch};
use roombrief_core::types::{ProjectId, Timestamp};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Remove every `null` object entry, at any depth.
pub fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Document written for a newly created project.
pub fn new_document(fields: &NewProject) -> Result<Value, StoreError> {
    let mut document = serde_json::to_value(fields)?;
    strip_nulls(&mut document);
    Ok(document)
}

/// Top-level fields written by an update.
pub fn patch_document(patch: &ProjectPatch) -> Result<Value, StoreError> {
    let mut document = serde_json::to_value(patch)?;
    strip_nulls(&mut document);
    Ok(document)
}

/// Shallow merge: each top-level key of `patch` replaces the one in `target`.
pub fn merge_document(target: &mut Value, patch: Value) {
    let Value::Object(patch) = patch else {
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(target) = target {
        target.extend(patch);
    }
}

/// Rebuild a project from its stored parts.
pub fn read_document(
    id: ProjectId,
    created_at: Timestamp,
    document: Value,
) -> Result<Project, StoreError> {
    let fields: NewProject = serde_json::from_value(document)?;
    Ok(Project::from_fields(id, created_at, fields))
}
