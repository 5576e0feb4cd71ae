use serde::{Deserialize, Serialize};

pub const RESOURCE_TYPES: [&str; 5] = ["video", "article", "documentation", "tutorial", "other"];

/// A learning resource with its vote totals and author/project labels
/// joined in, as shown in list and detail views.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceItem {
    pub id: i64,
    pub project_id: i64,
    pub project_name: String,
    pub user_id: i64,
    pub user_login: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub resource_type: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewResource {
    pub project_id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceFilter {
    pub project_id: Option<i64>,
    pub resource_type: Option<String>,
    pub search: Option<String>,
}

/// Outcome of a vote toggle, reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded,
    Changed,
    Removed,
}

impl VoteOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            VoteOutcome::Recorded => "Vote recorded",
            VoteOutcome::Changed => "Vote changed",
            VoteOutcome::Removed => "Vote removed",
        }
    }
}
