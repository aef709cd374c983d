//! User records.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use super::{generate_id, parse_timestamp, to_timestamp};
use crate::domain::{Theme, User};

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, mobile, theme, \
                            last_logged_in, created_at, updated_at";

/// Fields needed to create a user. The password must already be hashed.
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Profile fields a user may change; `None` keeps the stored value
#[derive(Debug, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub theme: Option<Theme>,
}

fn row_to_user(row: &Row) -> Result<User> {
    let theme: String = row.get(6)?;
    let last_logged_in: Option<String> = row.get(7)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;
    Ok(User {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password_hash: row.get(4)?,
        mobile: row.get(5)?,
        theme: Theme::from_str(&theme).unwrap_or_default(),
        last_logged_in: last_logged_in
            .map(|raw| parse_timestamp(7, &raw))
            .transpose()?,
        created_at: parse_timestamp(8, &created_at)?,
        updated_at: parse_timestamp(9, &updated_at)?,
    })
}

/// Create a new user, returns the stored record
pub fn create_user(conn: &Connection, new_user: &NewUser<'_>) -> Result<User> {
    let id = generate_id();
    let now = to_timestamp(&Utc::now());
    conn.execute(
        r#"INSERT INTO users (id, first_name, last_name, email, password_hash, theme,
                              last_logged_in, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, 'light', ?6, ?6, ?6)"#,
        params![
            id,
            new_user.first_name,
            new_user.last_name,
            new_user.email,
            new_user.password_hash,
            now
        ],
    )?;
    get_user_by_id(conn, &id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn get_user_by_id(conn: &Connection, user_id: &str) -> Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![user_id],
        row_to_user,
    )
    .optional()
}

/// Lookup is case-insensitive (column collation)
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
        params![email],
        row_to_user,
    )
    .optional()
}

/// Check if an email is already registered
pub fn email_exists(conn: &Connection, email: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Update user's last login timestamp
pub fn update_last_login(conn: &Connection, user_id: &str) -> Result<()> {
    let now = to_timestamp(&Utc::now());
    conn.execute(
        "UPDATE users SET last_logged_in = ?1 WHERE id = ?2",
        params![now, user_id],
    )?;
    Ok(())
}

/// Apply profile changes, returns the updated user (None if it no longer exists)
pub fn update_user(conn: &Connection, user_id: &str, changes: &UserChanges) -> Result<Option<User>> {
    let now = to_timestamp(&Utc::now());
    conn.execute(
        r#"UPDATE users SET
               first_name = COALESCE(?1, first_name),
               last_name = COALESCE(?2, last_name),
               theme = COALESCE(?3, theme),
               updated_at = ?4
           WHERE id = ?5"#,
        params![
            changes.first_name,
            changes.last_name,
            changes.theme.map(|t| t.as_str()),
            now,
            user_id
        ],
    )?;
    get_user_by_id(conn, user_id)
}
