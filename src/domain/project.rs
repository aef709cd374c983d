use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::files::{FileEntry, FilesPayload};

/// Name given to projects created without one
pub const DEFAULT_PROJECT_NAME: &str = "MyProject";

/// Stored project document. Files are embedded, never a separate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  pub id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// Owning user id
  pub user: String,
  pub files: Vec<FileEntry>,
  pub settings: ProjectSettings,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Per-project settings. Unknown keys are carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectSettings {
  pub framework: String,
  pub auto_save: bool,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Default for ProjectSettings {
  fn default() -> Self {
    Self {
      framework: "react".to_string(),
      auto_save: true,
      extra: Map::new(),
    }
  }
}

/// Request body for both create and update.
///
/// `files` stays a raw JSON value so the handler can tell "not provided"
/// apart from "provided but unusable".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPayload {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  /// `Some(None)` is an explicit `null`, which clears the description
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub description: Option<Option<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub files: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub settings: Option<ProjectSettings>,
}

/// Fully resolved project about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
  pub name: String,
  pub description: Option<String>,
  pub files: Vec<FileEntry>,
  pub settings: ProjectSettings,
}

/// Fields to overwrite on update; `None` leaves the stored value alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectChanges {
  pub name: Option<String>,
  /// `Some(None)` clears the stored description
  pub description: Option<Option<String>>,
  pub files: Option<Vec<FileEntry>>,
  pub settings: Option<ProjectSettings>,
}

/// Field was present in the body, possibly as `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(deserializer).map(Some)
}

impl ProjectPayload {
  fn files_payload(&self) -> Option<FilesPayload> {
    self.files.as_ref().map(FilesPayload::from_value)
  }

  /// Resolve a create request. Missing or unusable `files` become an empty list.
  pub fn into_new_project(self) -> NewProject {
    let files = match self.files_payload() {
      Some(payload) => {
        if !payload.is_recognized() {
          tracing::warn!("Unrecognized files payload on create, storing no files");
        }
        payload.into_listed()
      }
      None => Vec::new(),
    };

    let name = self
      .name
      .map(|n| n.trim().to_string())
      .filter(|n| !n.is_empty())
      .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());

    NewProject {
      name,
      description: self.description.flatten(),
      files,
      settings: self.settings.unwrap_or_default(),
    }
  }

  /// Resolve an update request into the fields that should change.
  ///
  /// Unusable `files` leave the stored files untouched rather than wiping them.
  pub fn into_changes(self) -> Result<ProjectChanges, String> {
    let files = match self.files_payload() {
      Some(payload) if payload.is_recognized() => Some(payload.into_listed()),
      Some(_) => {
        tracing::warn!("Unrecognized files payload on update, keeping stored files");
        None
      }
      None => None,
    };

    let name = match self.name {
      Some(n) if n.trim().is_empty() => {
        return Err("Project name cannot be empty".to_string());
      }
      Some(n) => Some(n.trim().to_string()),
      None => None,
    };

    Ok(ProjectChanges {
      name,
      description: self.description,
      files,
      settings: self.settings,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn payload(value: Value) -> ProjectPayload {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn test_create_defaults() {
    let project = payload(json!({})).into_new_project();
    assert_eq!(project.name, DEFAULT_PROJECT_NAME);
    assert!(project.files.is_empty());
    assert_eq!(project.settings.framework, "react");
    assert!(project.settings.auto_save);
  }

  #[test]
  fn test_create_blank_name_uses_default() {
    let project = payload(json!({ "name": "   " })).into_new_project();
    assert_eq!(project.name, DEFAULT_PROJECT_NAME);
  }

  #[test]
  fn test_create_accepts_keyed_files() {
    let project = payload(json!({
      "name": "Demo",
      "files": { "/src/App.js": "app", "/src/index.js": { "code": "i", "hidden": true } }
    }))
    .into_new_project();
    assert_eq!(project.files.len(), 2);
    assert!(project.files.iter().any(|f| f.path == "/src/index.js" && f.hidden));
  }

  #[test]
  fn test_create_malformed_files_is_empty() {
    let project = payload(json!({ "files": 42 })).into_new_project();
    assert!(project.files.is_empty());
  }

  #[test]
  fn test_update_distinguishes_absent_empty_and_malformed() {
    let absent = payload(json!({ "name": "x" })).into_changes().unwrap();
    assert_eq!(absent.files, None);

    let cleared = payload(json!({ "files": [] })).into_changes().unwrap();
    assert_eq!(cleared.files, Some(Vec::new()));

    let malformed = payload(json!({ "files": "x" })).into_changes().unwrap();
    assert_eq!(malformed.files, None);

    let null = payload(json!({ "files": null })).into_changes().unwrap();
    assert_eq!(null.files, None);
  }

  #[test]
  fn test_update_null_description_clears() {
    let absent = payload(json!({ "name": "x" })).into_changes().unwrap();
    assert_eq!(absent.description, None);

    let null = payload(json!({ "description": null })).into_changes().unwrap();
    assert_eq!(null.description, Some(None));

    let set = payload(json!({ "description": "notes" })).into_changes().unwrap();
    assert_eq!(set.description, Some(Some("notes".to_string())));

    let created = payload(json!({ "description": null })).into_new_project();
    assert_eq!(created.description, None);
  }

  #[test]
  fn test_update_rejects_blank_name() {
    assert!(payload(json!({ "name": "" })).into_changes().is_err());
  }

  #[test]
  fn test_settings_keep_unknown_keys() {
    let settings: ProjectSettings =
      serde_json::from_value(json!({ "autoSave": false, "tabSize": 4 })).unwrap();
    assert!(!settings.auto_save);
    assert_eq!(settings.framework, "react");
    assert_eq!(settings.extra["tabSize"], json!(4));

    let back = serde_json::to_value(&settings).unwrap();
    assert_eq!(back, json!({ "framework": "react", "autoSave": false, "tabSize": 4 }));
  }
}
