//! The in-memory editing session behind the IDE.

use chrono::{DateTime, Utc};

use super::autosave::AutosaveTimer;
use super::paths::{canonical_file_path, canonical_folder_path};
use super::template::{new_file_content, starter_files};
use super::EditorError;
use crate::domain::files::{
    first_visible_file, is_protected, listed_to_value, to_listed, DEFAULT_ENTRY_PATH,
};
use crate::domain::{
    FileCollection, FileEntry, FileRecord, FilesPayload, Project, ProjectPayload, ProjectSettings,
};

/// The stored project the session is editing
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
    pub settings: ProjectSettings,
}

impl From<&Project> for ProjectRef {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            settings: project.settings.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    files: FileCollection,
    active_file: String,
    project: Option<ProjectRef>,
    autosave: AutosaveTimer,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected<T>(err: EditorError) -> Result<T, EditorError> {
    tracing::debug!("Editor operation rejected: {}", err);
    Err(err)
}

/// Save request body plus the edit revision it captures
#[derive(Debug, Clone)]
pub struct PendingSave {
    pub payload: ProjectPayload,
    pub revision: u64,
}

/// Active file for a freshly loaded or pruned collection
fn derive_active_file(files: &FileCollection) -> String {
    first_visible_file(files)
        .unwrap_or(DEFAULT_ENTRY_PATH)
        .to_string()
}

impl EditorSession {
    /// Scratch session on the starter template, not bound to a project
    pub fn new() -> Self {
        let files = starter_files();
        Self {
            active_file: derive_active_file(&files),
            files,
            project: None,
            autosave: AutosaveTimer::default(),
        }
    }

    pub fn files(&self) -> &FileCollection {
        &self.files
    }

    pub fn active_file(&self) -> &str {
        &self.active_file
    }

    pub fn project(&self) -> Option<&ProjectRef> {
        self.project.as_ref()
    }

    /// Files in storage form
    pub fn to_listed(&self) -> Vec<FileEntry> {
        to_listed(&self.files)
    }

    // ==================== Load ====================

    /// Start editing a stored project, discarding any unsaved state
    pub fn load(&mut self, project: &Project) {
        self.project = Some(ProjectRef::from(project));
        self.load_files(FilesPayload::from(project.files.clone()));
    }

    /// Replace the collection with stored files in either shape
    pub fn load_files(&mut self, payload: FilesPayload) {
        self.files = payload.into_keyed();
        self.active_file = derive_active_file(&self.files);
        self.autosave.clear();
    }

    /// Detach from the project and go back to the starter template
    pub fn close_project(&mut self) {
        *self = Self::new();
    }

    // ==================== File operations ====================

    /// Create a file from user input and open it. Returns the canonical path.
    pub fn add_file(&mut self, input: &str) -> Result<String, EditorError> {
        let path = canonical_file_path(input).or_else(rejected)?;
        if self.files.contains_key(&path) {
            return rejected(EditorError::AlreadyExists(path));
        }

        self.files
            .insert(path.clone(), FileRecord::new(new_file_content(&path)));
        self.active_file = path.clone();
        self.touched();
        Ok(path)
    }

    /// Create a folder marker from user input. Returns the canonical path.
    pub fn add_folder(&mut self, input: &str) -> Result<String, EditorError> {
        let path = canonical_folder_path(input).or_else(rejected)?;
        if self.files.contains_key(&path) {
            return rejected(EditorError::AlreadyExists(path));
        }

        self.files.insert(path.clone(), FileRecord::default());
        self.touched();
        Ok(path)
    }

    pub fn delete_file(&mut self, path: &str) -> Result<(), EditorError> {
        if !self.files.contains_key(path) {
            return rejected(EditorError::NotFound(path.to_string()));
        }
        if is_protected(path) {
            return rejected(EditorError::Protected(path.to_string()));
        }

        self.files.remove(path);
        if self.active_file == path {
            self.active_file = derive_active_file(&self.files);
        }
        self.touched();
        Ok(())
    }

    /// Move a file's content to a new path; the active file follows it
    pub fn rename_file(&mut self, from: &str, to: &str) -> Result<(), EditorError> {
        if !self.files.contains_key(from) {
            return rejected(EditorError::NotFound(from.to_string()));
        }
        let to = to.trim();
        if to.is_empty() {
            return rejected(EditorError::EmptyName);
        }
        if to == from {
            return Ok(());
        }
        if self.files.contains_key(to) {
            return rejected(EditorError::AlreadyExists(to.to_string()));
        }

        if let Some(record) = self.files.remove(from) {
            self.files.insert(to.to_string(), record);
        }
        if self.active_file == from {
            self.active_file = to.to_string();
        }
        self.touched();
        Ok(())
    }

    /// Editor change event: replace a file's code and focus it
    pub fn edit_code(&mut self, path: &str, code: impl Into<String>) -> Result<(), EditorError> {
        let record = self
            .files
            .get_mut(path)
            .ok_or_else(|| EditorError::NotFound(path.to_string()))
            .or_else(rejected)?;
        record.code = code.into();
        self.active_file = path.to_string();
        self.touched();
        Ok(())
    }

    /// Tab or explorer selection
    pub fn set_active_file(&mut self, path: &str) -> Result<(), EditorError> {
        if !self.files.contains_key(path) {
            return rejected(EditorError::NotFound(path.to_string()));
        }
        self.active_file = path.to_string();
        Ok(())
    }

    // ==================== Save ====================

    /// Body for `POST /api/projects` seeded with the starter template
    pub fn new_project_payload(name: &str) -> ProjectPayload {
        ProjectPayload {
            name: Some(name.to_string()),
            files: Some(listed_to_value(&to_listed(&starter_files()))),
            ..Default::default()
        }
    }

    /// Body for `PUT /api/projects/{id}` with the current files
    pub fn save_payload(&self) -> Result<PendingSave, EditorError> {
        let project = self.project.as_ref().ok_or(EditorError::NoProject)?;
        Ok(PendingSave {
            payload: ProjectPayload {
                name: Some(project.name.clone()),
                files: Some(listed_to_value(&self.to_listed())),
                ..Default::default()
            },
            revision: self.autosave.revision(),
        })
    }

    /// Record a successful save of `revision`. Files are not reloaded; edits
    /// made after that revision stay in place and keep the session dirty.
    pub fn mark_saved(&mut self, project: &Project, revision: u64) {
        self.project = Some(ProjectRef::from(project));
        self.autosave.saved(revision);
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.autosave.is_dirty()
    }

    /// Save payload once the project wants autosave and edits have settled
    pub fn poll_autosave(&mut self, now: DateTime<Utc>) -> Option<PendingSave> {
        let enabled = self.project.as_ref().is_some_and(|p| p.settings.auto_save);
        if !enabled || !self.autosave.is_due(now) {
            return None;
        }
        let pending = self.save_payload().ok()?;
        self.autosave.begin_save();
        Some(pending)
    }

    fn touched(&mut self) {
        self.autosave.touch(Utc::now());
    }
}
