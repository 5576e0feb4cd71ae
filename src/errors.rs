use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

/// Application error taxonomy. Every precondition violation is detected
/// before any mutation and surfaced as one of these; the HTTP mapping lives
/// in `error_response`.
#[derive(Debug)]
pub enum AppError {
    Db(rusqlite::Error),
    Pool(r2d2::Error),
    Http(reqwest::Error),
    Jwt(jsonwebtoken::errors::Error),
    /// Missing or invalid bearer credential.
    Unauthorized,
    /// Authenticated but lacking the required capability.
    Forbidden(String),
    NotFound(&'static str),
    /// Malformed input (e.g. fewer than 2 choices, choice from another decision).
    Validation(String),
    /// Operation illegal for the entity's current status.
    InvalidState(String),
    /// Duplicate where uniqueness is required (e.g. second ballot).
    Conflict(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Pool(e) => write!(f, "Pool error: {e}"),
            AppError::Http(e) => write!(f, "Upstream HTTP error: {e}"),
            AppError::Jwt(e) => write!(f, "Token error: {e}"),
            AppError::Unauthorized => write!(f, "Not authenticated"),
            AppError::Forbidden(msg) => write!(f, "{msg}"),
            AppError::NotFound(what) => write!(f, "{what} not found"),
            AppError::Validation(msg) => write!(f, "{msg}"),
            AppError::InvalidState(msg) => write!(f, "{msg}"),
            AppError::Conflict(msg) => write!(f, "{msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized => {
                HttpResponse::Unauthorized().json(json!({ "error": self.to_string() }))
            }
            AppError::Forbidden(_) => {
                HttpResponse::Forbidden().json(json!({ "error": self.to_string() }))
            }
            AppError::NotFound(_) => {
                HttpResponse::NotFound().json(json!({ "error": self.to_string() }))
            }
            AppError::Validation(_) => {
                HttpResponse::BadRequest().json(json!({ "error": self.to_string() }))
            }
            AppError::InvalidState(_) | AppError::Conflict(_) => {
                HttpResponse::Conflict().json(json!({ "error": self.to_string() }))
            }
            AppError::Http(_) => {
                log::error!("{self}");
                HttpResponse::BadGateway().json(json!({ "error": "Upstream service error" }))
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().json(json!({ "error": "Internal server error" }))
            }
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Pool(e)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Http(e)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        AppError::Jwt(e)
    }
}

/// True when the error is a violation of a UNIQUE constraint. Used to map
/// duplicate-ballot races onto `Conflict` at the storage boundary.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
