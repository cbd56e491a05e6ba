use chrono::{DateTime, Utc};

/// One shared text snippet. Rows are never updated; a snippet simply stops
/// being served once `expires` has passed.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}
