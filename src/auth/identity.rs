use actix_web::HttpRequest;
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::user::{self, User};

/// Pull the bearer token out of the Authorization header, if any.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the authenticated user for a request. Fails `Unauthorized` when
/// the token is missing, invalid or expired, and `NotFound` when the token
/// references a user that no longer exists.
pub fn require_user(
    req: &HttpRequest,
    conn: &Connection,
    config: &AppConfig,
) -> Result<User, AppError> {
    let token = bearer_token(req).ok_or(AppError::Unauthorized)?;
    let user_id = crate::auth::jwt::verify_token(&config.jwt_secret, token)
        .ok_or(AppError::Unauthorized)?;
    user::find_by_id(conn, user_id)?.ok_or(AppError::NotFound("User"))
}

/// Optional variant for read endpoints that personalize output but don't
/// require login: resolves to `None` instead of failing.
pub fn maybe_user(
    req: &HttpRequest,
    conn: &Connection,
    config: &AppConfig,
) -> Result<Option<User>, AppError> {
    let Some(token) = bearer_token(req) else {
        return Ok(None);
    };
    match crate::auth::jwt::verify_token(&config.jwt_secret, token) {
        Some(user_id) => user::find_by_id(conn, user_id),
        None => Ok(None),
    }
}

/// Staff capability gate. Error text deliberately says nothing about the
/// entity the caller was trying to act on.
pub fn require_staff(user: &User) -> Result<(), AppError> {
    if user.is_staff() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Staff access required".to_string()))
    }
}
