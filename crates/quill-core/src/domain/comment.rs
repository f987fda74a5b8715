use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity - a reader's comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A comment about to be persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub author_id: i64,
    pub body: String,
}
