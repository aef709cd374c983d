//! Client-side editing model.
//!
//! Holds the live file collection in keyed form, converts to and from the
//! stored listed form on load/save, and keeps the active-file pointer valid
//! while files are added, renamed or deleted.

pub mod autosave;
pub mod paths;
pub mod session;
pub mod template;

pub use autosave::AutosaveTimer;
pub use session::{EditorSession, PendingSave, ProjectRef};

/// A rejected editor operation. The message is meant for the user; the
/// session is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("Please enter a name.")]
    EmptyName,

    #[error("File names cannot end with a '/' ({0}). Use 'New Folder' to create a directory.")]
    FileNameIsFolder(String),

    #[error("Cannot create an empty folder or 'src' itself.")]
    InvalidFolder,

    #[error("Something already exists at {0}")]
    AlreadyExists(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Cannot delete the main entry file {0}")]
    Protected(String),

    #[error("Please create or load a project before saving.")]
    NoProject,
}
