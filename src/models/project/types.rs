use serde::Serialize;

/// A common-core project that resources, tests and decisions hang off.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub order_index: i64,
}
