pub mod files;
pub mod project;
pub mod user;

pub use files::{FileCollection, FileEntry, FileRecord, FilesPayload};
pub use project::{NewProject, Project, ProjectChanges, ProjectPayload, ProjectSettings};
pub use user::{PublicUser, Theme, User};
