use serde::Serialize;

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_STAFF: &str = "staff";

/// A platform member, mirrored from the identity provider. The id is the
/// stable intra id, never generated locally.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub campus_id: Option<i64>,
    pub created_at: String,
}

impl User {
    pub fn is_staff(&self) -> bool {
        self.role == ROLE_STAFF
    }
}

/// Profile fields written on each OAuth login.
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_staff: bool,
    pub campus_id: Option<i64>,
}
