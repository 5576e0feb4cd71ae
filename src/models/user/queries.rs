use rusqlite::{Connection, OptionalExtension, params};

use super::types::*;
use crate::errors::AppError;

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        login: row.get("login")?,
        email: row.get("email")?,
        display_name: row.get("display_name")?,
        avatar_url: row.get("avatar_url")?,
        role: row.get("role")?,
        campus_id: row.get("campus_id")?,
        created_at: row.get("created_at")?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<User>, AppError> {
    let user = conn
        .query_row(
            "SELECT id, login, email, display_name, avatar_url, role, campus_id, created_at
             FROM users WHERE id = ?1",
            params![id],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}

pub fn find_by_login(conn: &Connection, login: &str) -> Result<Option<User>, AppError> {
    let user = conn
        .query_row(
            "SELECT id, login, email, display_name, avatar_url, role, campus_id, created_at
             FROM users WHERE login = ?1",
            params![login],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}

/// Insert or refresh a user from the OAuth profile. The role is taken from
/// the provider on every login so a staff promotion propagates.
pub fn upsert(conn: &Connection, profile: &UpsertUser) -> Result<User, AppError> {
    let role = if profile.is_staff { ROLE_STAFF } else { ROLE_STUDENT };
    conn.execute(
        "INSERT INTO users (id, login, email, display_name, avatar_url, role, campus_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
             login = excluded.login,
             email = excluded.email,
             display_name = excluded.display_name,
             avatar_url = excluded.avatar_url,
             role = excluded.role,
             campus_id = excluded.campus_id,
             updated_at = datetime('now')",
        params![
            profile.id,
            profile.login,
            profile.email,
            profile.display_name,
            profile.avatar_url,
            role,
            profile.campus_id,
        ],
    )?;
    find_by_id(conn, profile.id)?.ok_or(AppError::NotFound("User"))
}
