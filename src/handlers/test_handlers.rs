use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::auth::identity;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::test_case::{self, NewTestCase, TestCaseFilter};

/// GET /api/tests - approved tests by default, ordered by downloads.
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<TestCaseFilter>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let items = test_case::list(&conn, &query)?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/tests - new tests start unapproved.
pub async fn create(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    payload: web::Json<NewTestCase>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let current = identity::require_user(&req, &conn, &config)?;
    let id = test_case::create(&conn, current.id, &payload)?;
    Ok(HttpResponse::Created().json(json!({
        "id": id,
        "message": "Test submitted, awaiting staff approval"
    })))
}

/// GET /api/tests/{id}
pub async fn read(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let item = test_case::find_by_id(&conn, path.into_inner())?
        .ok_or(AppError::NotFound("Test"))?;
    Ok(HttpResponse::Ok().json(item))
}

/// POST /api/tests/{id}/approve - staff only.
pub async fn approve(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let current = identity::require_user(&req, &conn, &config)?;
    test_case::approve(&conn, path.into_inner(), &current)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Test approved" })))
}

/// GET /api/tests/{id}/download - returns the code body and bumps the
/// download counter.
pub async fn download(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let mut conn = pool.get()?;
    let (title, code) = test_case::download(&mut conn, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "title": title, "code": code })))
}

/// DELETE /api/tests/{id} - owner or staff.
pub async fn delete(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let current = identity::require_user(&req, &conn, &config)?;
    test_case::delete(&conn, path.into_inner(), &current)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Test deleted" })))
}
