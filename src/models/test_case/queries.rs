use rusqlite::{Connection, OptionalExtension, params};

use super::types::*;
use crate::errors::AppError;
use crate::models::project;
use crate::models::user::User;

const ITEM_SELECT: &str = "SELECT t.id, t.project_id, t.user_id, u.login AS user_login, \
            t.title, t.description, t.language, t.downloads, t.is_approved, t.created_at \
     FROM test_cases t \
     JOIN users u ON u.id = t.user_id";

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<TestCaseItem> {
    Ok(TestCaseItem {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        user_id: row.get("user_id")?,
        user_login: row.get("user_login")?,
        title: row.get("title")?,
        description: row.get("description")?,
        language: row.get("language")?,
        downloads: row.get("downloads")?,
        is_approved: row.get("is_approved")?,
        created_at: row.get("created_at")?,
    })
}

/// List test cases ordered by download count. `approved_only` defaults to
/// true; passing false exposes the moderation queue to staff views.
pub fn list(conn: &Connection, filter: &TestCaseFilter) -> Result<Vec<TestCaseItem>, AppError> {
    let mut sql = format!("{ITEM_SELECT} WHERE 1=1");
    let mut bind: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(project_id) = filter.project_id {
        sql.push_str(&format!(" AND t.project_id = ?{}", bind.len() + 1));
        bind.push(Box::new(project_id));
    }
    if filter.approved_only.unwrap_or(true) {
        sql.push_str(" AND t.is_approved = 1");
    }
    sql.push_str(" ORDER BY t.downloads DESC, t.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map(rusqlite::params_from_iter(bind.iter().map(|value| value.as_ref())), row_to_item)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<TestCaseItem>, AppError> {
    let item = conn
        .query_row(
            &format!("{ITEM_SELECT} WHERE t.id = ?1"),
            params![id],
            row_to_item,
        )
        .optional()?;
    Ok(item)
}

pub fn create(conn: &Connection, user_id: i64, input: &NewTestCase) -> Result<i64, AppError> {
    if input.title.trim().is_empty() || input.code.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and code must not be empty".to_string(),
        ));
    }
    if !project::exists(conn, input.project_id)? {
        return Err(AppError::NotFound("Project"));
    }

    conn.execute(
        "INSERT INTO test_cases (project_id, user_id, title, description, code, language)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            input.project_id,
            user_id,
            input.title,
            input.description,
            input.code,
            input.language.as_deref().unwrap_or("python"),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Staff approval gate. Idempotent: approving an approved test is a no-op.
pub fn approve(conn: &Connection, test_id: i64, staff: &User) -> Result<(), AppError> {
    if !staff.is_staff() {
        return Err(AppError::Forbidden("Staff access required".to_string()));
    }
    let updated = conn.execute(
        "UPDATE test_cases SET is_approved = 1, updated_at = datetime('now') WHERE id = ?1",
        params![test_id],
    )?;
    if updated == 0 {
        return Err(AppError::NotFound("Test"));
    }
    Ok(())
}

/// Fetch the code body and bump the download counter in one transaction.
pub fn download(conn: &mut Connection, test_id: i64) -> Result<(String, String), AppError> {
    let tx = conn.transaction()?;
    let row: Option<(String, String)> = tx
        .query_row(
            "SELECT title, code FROM test_cases WHERE id = ?1",
            params![test_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    let (title, code) = row.ok_or(AppError::NotFound("Test"))?;
    tx.execute(
        "UPDATE test_cases SET downloads = downloads + 1 WHERE id = ?1",
        params![test_id],
    )?;
    tx.commit()?;
    Ok((title, code))
}

pub fn delete(conn: &Connection, test_id: i64, actor: &User) -> Result<(), AppError> {
    let owner_id: Option<i64> = conn
        .query_row(
            "SELECT user_id FROM test_cases WHERE id = ?1",
            params![test_id],
            |row| row.get(0),
        )
        .optional()?;
    let owner_id = owner_id.ok_or(AppError::NotFound("Test"))?;
    if owner_id != actor.id && !actor.is_staff() {
        return Err(AppError::Forbidden(
            "Only the owner or staff can delete a test".to_string(),
        ));
    }
    conn.execute("DELETE FROM test_cases WHERE id = ?1", params![test_id])?;
    Ok(())
}
