use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::auth::identity;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::resource::{self, NewResource, ResourceFilter};

/// GET /api/resources - public listing with optional filters.
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<ResourceFilter>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let items = resource::list(&conn, &query)?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/resources
pub async fn create(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    payload: web::Json<NewResource>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let current = identity::require_user(&req, &conn, &config)?;
    let id = resource::create(&conn, current.id, &payload)?;
    Ok(HttpResponse::Created().json(json!({
        "id": id,
        "message": "Resource created successfully"
    })))
}

/// GET /api/resources/{id}
pub async fn read(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let item = resource::find_by_id(&conn, path.into_inner())?
        .ok_or(AppError::NotFound("Resource"))?;
    Ok(HttpResponse::Ok().json(item))
}

#[derive(Deserialize)]
pub struct VotePayload {
    pub is_upvote: bool,
}

/// POST /api/resources/{id}/vote - up/down with toggle semantics.
pub async fn vote(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    path: web::Path<i64>,
    payload: web::Json<VotePayload>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let current = identity::require_user(&req, &conn, &config)?;
    let outcome = resource::vote(&conn, path.into_inner(), current.id, payload.is_upvote)?;
    Ok(HttpResponse::Ok().json(json!({ "message": outcome.message() })))
}

/// DELETE /api/resources/{id} - owner or staff.
pub async fn delete(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let current = identity::require_user(&req, &conn, &config)?;
    resource::delete(&conn, path.into_inner(), &current)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Resource deleted successfully" })))
}
