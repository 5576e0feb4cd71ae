use serde::Deserialize;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Response from the intra token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// The slice of the intra `/v2/me` profile we persist.
#[derive(Debug, Deserialize)]
pub struct IntraProfile {
    pub id: i64,
    pub login: String,
    pub email: String,
    #[serde(default)]
    pub displayname: Option<String>,
    #[serde(default)]
    pub image: Option<IntraImage>,
    #[serde(default, rename = "staff?")]
    pub is_staff: bool,
    #[serde(default)]
    pub campus: Vec<IntraCampus>,
}

#[derive(Debug, Deserialize)]
pub struct IntraImage {
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IntraCampus {
    pub id: i64,
}

impl IntraProfile {
    pub fn avatar_url(&self) -> Option<String> {
        self.image.as_ref().and_then(|i| i.link.clone())
    }

    pub fn campus_id(&self) -> Option<i64> {
        self.campus.first().map(|c| c.id)
    }
}

/// Authorization URL the login endpoint redirects to.
pub fn authorization_url(config: &AppConfig) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope=public",
        config.ft_auth_url, config.ft_client_id, config.ft_redirect_uri
    )
}

/// Exchange an authorization code for an access token.
pub async fn exchange_code(config: &AppConfig, code: &str) -> Result<TokenResponse, AppError> {
    let client = reqwest::Client::new();
    let response = client
        .post(&config.ft_token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", config.ft_client_id.as_str()),
            ("client_secret", config.ft_client_secret.as_str()),
            ("code", code),
            ("redirect_uri", config.ft_redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;
    Ok(response.json().await?)
}

/// Fetch the authenticated user's profile from the intra API.
pub async fn fetch_profile(config: &AppConfig, access_token: &str) -> Result<IntraProfile, AppError> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/me", config.ft_api_url))
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.json().await?)
}
