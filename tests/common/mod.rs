//! Shared test infrastructure for model layer tests.
//!
//! `setup_test_db()` creates a temporary SQLite database with the full
//! schema applied, plus helpers for the users and projects most tests need.

// Not every test binary uses every helper.
#![allow(dead_code)]

use rusqlite::{Connection, params};
use tempfile::TempDir;

use ft_nexus::config::AppConfig;
use ft_nexus::db::{self, DbPool, MIGRATIONS};

/// Setup a test database with schema applied.
///
/// Returns a tuple of (TempDir, Connection) where TempDir must be kept
/// alive for the Connection to remain valid.
pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");

    (dir, conn)
}

/// Pooled variant for HTTP-level tests that build a full actix App.
pub fn setup_test_pool() -> (TempDir, DbPool) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let pool = db::init_pool(db_path.to_str().expect("utf-8 path"));
    db::run_migrations(&pool);
    (dir, pool)
}

/// Configuration for tests: local paths, a fixed JWT secret, no OAuth.
pub fn test_config() -> AppConfig {
    AppConfig {
        database_path: ":memory:".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        frontend_url: "http://localhost:5173".to_string(),
        ft_client_id: String::new(),
        ft_client_secret: String::new(),
        ft_redirect_uri: String::new(),
        ft_auth_url: "https://api.intra.42.fr/oauth/authorize".to_string(),
        ft_token_url: "https://api.intra.42.fr/oauth/token".to_string(),
        ft_api_url: "https://api.intra.42.fr/v2".to_string(),
        jwt_secret: "test-secret-key".to_string(),
        jwt_expiration: 3600,
    }
}

/// Insert a user with an explicit (intra-style) id.
pub fn create_user(conn: &Connection, id: i64, login: &str, staff: bool) -> i64 {
    let role = if staff { "staff" } else { "student" };
    conn.execute(
        "INSERT INTO users (id, login, email, display_name, role)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, login, format!("{login}@student.42.fr"), login, role],
    )
    .expect("Failed to insert test user");
    id
}

/// Fetch a full `User` for passing to role-gated model functions.
pub fn get_user(conn: &Connection, id: i64) -> ft_nexus::models::user::User {
    ft_nexus::models::user::find_by_id(conn, id)
        .expect("user lookup")
        .expect("user exists")
}

/// Insert a project and return its id.
pub fn create_project(conn: &Connection, name: &str, slug: &str) -> i64 {
    conn.execute(
        "INSERT INTO projects (name, slug, description, order_index) VALUES (?1, ?2, '', 0)",
        params![name, slug],
    )
    .expect("Failed to insert test project");
    conn.last_insert_rowid()
}
