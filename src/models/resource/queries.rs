use rusqlite::{Connection, OptionalExtension, params};

use super::types::*;
use crate::errors::AppError;
use crate::models::project;
use crate::models::user::User;

const ITEM_SELECT: &str = "SELECT r.id, r.project_id, p.name AS project_name, \
            r.user_id, u.login AS user_login, \
            r.title, r.url, r.description, r.resource_type, r.created_at, \
            COALESCE(SUM(CASE WHEN v.is_upvote = 1 THEN 1 ELSE 0 END), 0) AS upvotes, \
            COALESCE(SUM(CASE WHEN v.is_upvote = 0 THEN 1 ELSE 0 END), 0) AS downvotes \
     FROM resources r \
     JOIN projects p ON p.id = r.project_id \
     JOIN users u ON u.id = r.user_id \
     LEFT JOIN resource_votes v ON v.resource_id = r.id";

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<ResourceItem> {
    Ok(ResourceItem {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        project_name: row.get("project_name")?,
        user_id: row.get("user_id")?,
        user_login: row.get("user_login")?,
        title: row.get("title")?,
        url: row.get("url")?,
        description: row.get("description")?,
        resource_type: row.get("resource_type")?,
        upvotes: row.get("upvotes")?,
        downvotes: row.get("downvotes")?,
        created_at: row.get("created_at")?,
    })
}

/// List resources, newest first, with optional project / type / title filters.
pub fn list(conn: &Connection, filter: &ResourceFilter) -> Result<Vec<ResourceItem>, AppError> {
    let mut sql = format!("{ITEM_SELECT} WHERE 1=1");
    let mut bind: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(project_id) = filter.project_id {
        sql.push_str(&format!(" AND r.project_id = ?{}", bind.len() + 1));
        bind.push(Box::new(project_id));
    }
    if let Some(resource_type) = filter.resource_type.as_deref() {
        sql.push_str(&format!(" AND r.resource_type = ?{}", bind.len() + 1));
        bind.push(Box::new(resource_type.to_string()));
    }
    if let Some(search) = filter.search.as_deref() {
        sql.push_str(&format!(" AND r.title LIKE ?{}", bind.len() + 1));
        bind.push(Box::new(format!("%{search}%")));
    }
    sql.push_str(" GROUP BY r.id ORDER BY r.created_at DESC, r.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map(rusqlite::params_from_iter(bind.iter().map(|value| value.as_ref())), row_to_item)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<ResourceItem>, AppError> {
    let item = conn
        .query_row(
            &format!("{ITEM_SELECT} WHERE r.id = ?1 GROUP BY r.id"),
            params![id],
            row_to_item,
        )
        .optional()?;
    Ok(item)
}

pub fn create(conn: &Connection, user_id: i64, input: &NewResource) -> Result<i64, AppError> {
    if input.title.trim().is_empty() || input.url.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and URL must not be empty".to_string(),
        ));
    }
    let resource_type = input.resource_type.as_deref().unwrap_or("other");
    if !RESOURCE_TYPES.contains(&resource_type) {
        return Err(AppError::Validation(format!(
            "Unknown resource type '{resource_type}'"
        )));
    }
    if !project::exists(conn, input.project_id)? {
        return Err(AppError::NotFound("Project"));
    }

    conn.execute(
        "INSERT INTO resources (project_id, user_id, title, url, description, resource_type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            input.project_id,
            user_id,
            input.title,
            input.url,
            input.description,
            resource_type,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Toggle semantics, unlike decision ballots: same direction again removes
/// the vote, opposite direction flips it, no prior vote records one.
pub fn vote(
    conn: &Connection,
    resource_id: i64,
    user_id: i64,
    is_upvote: bool,
) -> Result<VoteOutcome, AppError> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM resources WHERE id = ?1",
        params![resource_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(AppError::NotFound("Resource"));
    }

    let existing: Option<(i64, bool)> = conn
        .query_row(
            "SELECT id, is_upvote FROM resource_votes WHERE resource_id = ?1 AND user_id = ?2",
            params![resource_id, user_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match existing {
        Some((vote_id, prior)) if prior == is_upvote => {
            conn.execute("DELETE FROM resource_votes WHERE id = ?1", params![vote_id])?;
            Ok(VoteOutcome::Removed)
        }
        Some((vote_id, _)) => {
            conn.execute(
                "UPDATE resource_votes SET is_upvote = ?1 WHERE id = ?2",
                params![is_upvote, vote_id],
            )?;
            Ok(VoteOutcome::Changed)
        }
        None => {
            conn.execute(
                "INSERT INTO resource_votes (resource_id, user_id, is_upvote) VALUES (?1, ?2, ?3)",
                params![resource_id, user_id, is_upvote],
            )?;
            Ok(VoteOutcome::Recorded)
        }
    }
}

/// Delete a resource (owner or staff).
pub fn delete(conn: &Connection, resource_id: i64, actor: &User) -> Result<(), AppError> {
    let owner_id: Option<i64> = conn
        .query_row(
            "SELECT user_id FROM resources WHERE id = ?1",
            params![resource_id],
            |row| row.get(0),
        )
        .optional()?;
    let owner_id = owner_id.ok_or(AppError::NotFound("Resource"))?;
    if owner_id != actor.id && !actor.is_staff() {
        return Err(AppError::Forbidden(
            "Only the owner or staff can delete a resource".to_string(),
        ));
    }
    conn.execute("DELETE FROM resources WHERE id = ?1", params![resource_id])?;
    Ok(())
}
