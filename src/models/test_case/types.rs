use serde::{Deserialize, Serialize};

/// A shared test case. Only staff-approved tests show up in the default
/// listing; the code body is excluded from lists and fetched on download.
#[derive(Debug, Clone, Serialize)]
pub struct TestCaseItem {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub user_login: String,
    pub title: String,
    pub description: Option<String>,
    pub language: String,
    pub downloads: i64,
    pub is_approved: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTestCase {
    pub project_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestCaseFilter {
    pub project_id: Option<i64>,
    pub approved_only: Option<bool>,
}
