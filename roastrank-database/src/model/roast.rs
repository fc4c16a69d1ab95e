use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored roast. Counters are maintained transactionally with vote rows
/// and re-derivable from them.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Roast {
    pub id: i64,
    pub author_id: i64,
    pub target_id: i64,
    pub content: String,
    pub created_at: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub is_hidden: bool,
    pub is_flagged: bool,
    pub parent_id: Option<i64>,
}

/// Roast joined with the author fields feed views display.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RoastWithAuthor {
    pub id: i64,
    pub author_id: i64,
    pub target_id: i64,
    pub content: String,
    pub created_at: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub is_flagged: bool,
    pub parent_id: Option<i64>,
    pub author_username: String,
    pub author_avatar_url: Option<String>,
    pub author_level: i64,
}
