use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Issue an HS256 access token for a user id.
pub fn create_access_token(secret: &str, user_id: i64, lifetime_secs: i64) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: Utc::now().timestamp() + lifetime_secs,
    };
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify a token and return the user id it was issued for.
/// Expired, malformed or wrongly-signed tokens all return `None`.
pub fn verify_token(secret: &str, token: &str) -> Option<i64> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .ok()?;
    data.claims.sub.parse().ok()
}
