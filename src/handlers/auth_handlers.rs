use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::auth::{identity, jwt, oauth};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user::{self, UpsertUser};

/// GET /api/auth/login - redirect to the intra authorize page.
pub async fn login(config: web::Data<AppConfig>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header(("Location", oauth::authorization_url(&config)))
        .finish()
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: String,
}

/// GET /api/auth/callback - exchange the code, upsert the user from the
/// intra profile, and hand the SPA a bearer token via redirect.
pub async fn callback(
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    query: web::Query<CallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let token = oauth::exchange_code(&config, &query.code).await?;
    let profile = oauth::fetch_profile(&config, &token.access_token).await?;

    let conn = pool.get()?;
    let saved = user::upsert(
        &conn,
        &UpsertUser {
            id: profile.id,
            login: profile.login.clone(),
            email: profile.email.clone(),
            display_name: profile.displayname.clone(),
            avatar_url: profile.avatar_url(),
            is_staff: profile.is_staff,
            campus_id: profile.campus_id(),
        },
    )?;
    log::info!("OAuth login: {} (staff: {})", saved.login, saved.is_staff());

    let access_token =
        jwt::create_access_token(&config.jwt_secret, saved.id, config.jwt_expiration)?;
    Ok(HttpResponse::Found()
        .insert_header((
            "Location",
            format!("{}/auth/callback?token={access_token}", config.frontend_url),
        ))
        .finish())
}

/// GET /api/auth/me - the authenticated user's own profile.
pub async fn me(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let current = identity::require_user(&req, &conn, &config)?;
    Ok(HttpResponse::Ok().json(current))
}
