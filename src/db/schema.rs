//! Schema for the studio database (users, projects).
//!
//! ## Migration System
//!
//! Migrations are version-gated: each one checks the recorded schema version,
//! runs its SQL, then records the new version in `db_version`. A fresh
//! database walks every step once; an existing one only runs what it lacks.

use chrono::Utc;
use rusqlite::{params, Connection, Result};

/// Current schema version
/// Increment this when adding a new migration
pub const DB_VERSION: i32 = 2;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS db_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL,
            description TEXT
        );
        "#,
    )?;

    let current_version = get_schema_version(conn)?;
    tracing::debug!("schema version: {}", current_version);

    if current_version < 1 {
        migrate_v0_to_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v1_to_v2(conn)?;
    }

    Ok(())
}

/// v0→v1: users
fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v0→v1: Create users table");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password_hash TEXT NOT NULL,
            mobile TEXT,
            theme TEXT NOT NULL DEFAULT 'light',
            last_logged_in TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    record_version(conn, 1, "Create users table")?;
    Ok(())
}

/// v1→v2: projects with embedded files and settings
fn migrate_v1_to_v2(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v1→v2: Create projects table");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL DEFAULT 'MyProject',
            description TEXT,
            -- JSON array of {path, code, hidden}
            files TEXT NOT NULL DEFAULT '[]',
            -- JSON object {framework, autoSave, ...}
            settings TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_projects_user_updated
            ON projects(user_id, updated_at DESC);
        "#,
    )?;

    record_version(conn, 2, "Create projects table")?;
    Ok(())
}

/// Record a schema version after successful migration
fn record_version(conn: &Connection, version: i32, description: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO db_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        params![version, now, description],
    )?;
    tracing::info!("Recorded schema version {} - {}", version, description);
    Ok(())
}

/// Get current schema version (0 if no versions recorded)
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM db_version",
        [],
        |row| row.get(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_reach_latest_version() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), DB_VERSION);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM db_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, DB_VERSION as i64);
    }
}
