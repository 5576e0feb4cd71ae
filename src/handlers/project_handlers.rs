use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::project;

/// GET /api/projects - the full catalogue, ordered by curriculum position.
pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let projects = project::find_all(&conn)?;
    Ok(HttpResponse::Ok().json(projects))
}

/// GET /api/projects/{id}
pub async fn read(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let project = project::find_by_id(&conn, path.into_inner())?
        .ok_or(AppError::NotFound("Project"))?;
    Ok(HttpResponse::Ok().json(project))
}

/// GET /api/projects/slug/{slug}
pub async fn read_by_slug(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let project = project::find_by_slug(&conn, &path.into_inner())?
        .ok_or(AppError::NotFound("Project"))?;
    Ok(HttpResponse::Ok().json(project))
}
