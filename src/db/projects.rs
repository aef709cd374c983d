//! Project documents. Every id-addressed query is scoped to the owner, so a
//! project belonging to someone else is indistinguishable from a missing one.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use super::{generate_id, parse_json, parse_timestamp, to_json, to_timestamp};
use crate::domain::{NewProject, Project, ProjectChanges};

const PROJECT_COLUMNS: &str =
    "id, user_id, name, description, files, settings, created_at, updated_at";

fn row_to_project(row: &Row) -> Result<Project> {
    let files: String = row.get(4)?;
    let settings: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;
    Ok(Project {
        id: row.get(0)?,
        user: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        files: parse_json(4, &files)?,
        settings: parse_json(5, &settings)?,
        created_at: parse_timestamp(6, &created_at)?,
        updated_at: parse_timestamp(7, &updated_at)?,
    })
}

/// All projects owned by a user, most recently updated first
pub fn list_projects(conn: &Connection, user_id: &str) -> Result<Vec<Project>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE user_id = ?1 \
         ORDER BY updated_at DESC, rowid DESC"
    ))?;
    let projects = stmt
        .query_map(params![user_id], row_to_project)?
        .collect::<Result<Vec<_>>>()?;
    Ok(projects)
}

pub fn get_project(conn: &Connection, project_id: &str, user_id: &str) -> Result<Option<Project>> {
    conn.query_row(
        &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1 AND user_id = ?2"),
        params![project_id, user_id],
        row_to_project,
    )
    .optional()
}

pub fn create_project(conn: &Connection, user_id: &str, project: &NewProject) -> Result<Project> {
    let id = generate_id();
    let now = to_timestamp(&Utc::now());
    conn.query_row(
        &format!(
            r#"INSERT INTO projects (id, user_id, name, description, files, settings, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
               RETURNING {PROJECT_COLUMNS}"#
        ),
        params![
            id,
            user_id,
            project.name,
            project.description,
            to_json(&project.files)?,
            to_json(&project.settings)?,
            now
        ],
        row_to_project,
    )
}

/// Merge the provided fields into an owned project in a single statement.
/// Returns None when the id does not resolve to one of the user's projects.
pub fn update_project(
    conn: &Connection,
    project_id: &str,
    user_id: &str,
    changes: &ProjectChanges,
) -> Result<Option<Project>> {
    let files = changes.files.as_ref().map(to_json).transpose()?;
    let settings = changes.settings.as_ref().map(to_json).transpose()?;
    let now = to_timestamp(&Utc::now());

    conn.query_row(
        &format!(
            r#"UPDATE projects SET
                   name = COALESCE(?1, name),
                   description = CASE WHEN ?2 THEN ?3 ELSE description END,
                   files = COALESCE(?4, files),
                   settings = COALESCE(?5, settings),
                   updated_at = ?6
               WHERE id = ?7 AND user_id = ?8
               RETURNING {PROJECT_COLUMNS}"#
        ),
        params![
            changes.name,
            changes.description.is_some(),
            changes.description.as_ref().and_then(|d| d.as_deref()),
            files,
            settings,
            now,
            project_id,
            user_id
        ],
        row_to_project,
    )
    .optional()
}

/// Returns false when nothing was deleted
pub fn delete_project(conn: &Connection, project_id: &str, user_id: &str) -> Result<bool> {
    let count = conn.execute(
        "DELETE FROM projects WHERE id = ?1 AND user_id = ?2",
        params![project_id, user_id],
    )?;
    Ok(count > 0)
}
