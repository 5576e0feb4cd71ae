use std::env;

/// Process configuration, built once in `main` from the environment and
/// passed to handlers as app data. No ambient global.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub bind_addr: String,
    pub frontend_url: String,

    pub ft_client_id: String,
    pub ft_client_secret: String,
    pub ft_redirect_uri: String,
    pub ft_auth_url: String,
    pub ft_token_url: String,
    pub ft_api_url: String,

    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: i64,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    /// Load configuration from environment variables (dotenvy has already
    /// loaded `.env` by the time this runs). OAuth credentials have no
    /// sensible defaults; missing ones are left empty and logged so the
    /// server can still come up for local, auth-less development.
    pub fn from_env() -> AppConfig {
        let config = AppConfig {
            database_path: var_or("DATABASE_PATH", "data/nexus.db"),
            bind_addr: var_or("BIND_ADDR", "127.0.0.1:8080"),
            frontend_url: var_or("FRONTEND_URL", "http://localhost:5173"),
            ft_client_id: var_or("FT_CLIENT_ID", ""),
            ft_client_secret: var_or("FT_CLIENT_SECRET", ""),
            ft_redirect_uri: var_or("FT_REDIRECT_URI", "http://localhost:8080/api/auth/callback"),
            ft_auth_url: var_or("FT_AUTH_URL", "https://api.intra.42.fr/oauth/authorize"),
            ft_token_url: var_or("FT_TOKEN_URL", "https://api.intra.42.fr/oauth/token"),
            ft_api_url: var_or("FT_API_URL", "https://api.intra.42.fr/v2"),
            jwt_secret: var_or("JWT_SECRET", ""),
            jwt_expiration: var_or("JWT_EXPIRATION", "86400")
                .parse()
                .unwrap_or(86400),
        };

        if config.ft_client_id.is_empty() || config.ft_client_secret.is_empty() {
            log::warn!("FT_CLIENT_ID / FT_CLIENT_SECRET not set; OAuth login will fail");
        }
        if config.jwt_secret.is_empty() {
            log::warn!("JWT_SECRET not set; using an empty signing key (dev only)");
        }

        config
    }
}
