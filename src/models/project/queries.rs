use rusqlite::{Connection, OptionalExtension, params};

use super::types::*;
use crate::errors::AppError;

fn row_to_project(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        slug: row.get("slug")?,
        description: row.get("description")?,
        order_index: row.get("order_index")?,
    })
}

pub fn find_all(conn: &Connection) -> Result<Vec<Project>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, slug, description, order_index
         FROM projects ORDER BY order_index",
    )?;
    let projects = stmt
        .query_map([], row_to_project)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Project>, AppError> {
    let project = conn
        .query_row(
            "SELECT id, name, slug, description, order_index FROM projects WHERE id = ?1",
            params![id],
            row_to_project,
        )
        .optional()?;
    Ok(project)
}

pub fn find_by_slug(conn: &Connection, slug: &str) -> Result<Option<Project>, AppError> {
    let project = conn
        .query_row(
            "SELECT id, name, slug, description, order_index FROM projects WHERE slug = ?1",
            params![slug],
            row_to_project,
        )
        .optional()?;
    Ok(project)
}

pub fn exists(conn: &Connection, id: i64) -> Result<bool, AppError> {
    let found: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM projects WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(found)
}
