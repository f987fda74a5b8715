use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DomainError;

/// Post entity - a published blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub subtitle: String,
    /// Human-readable creation date, captured once and never edited.
    pub date: String,
    pub body: String,
    pub img_url: String,
}

/// The editable fields of a post, validated before any write.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub img_url: String,
}

impl PostDraft {
    /// All text fields must be non-empty and the image reference must be
    /// a well-formed URL.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }
        if self.subtitle.trim().is_empty() {
            return Err(DomainError::Validation("Subtitle is required".to_string()));
        }
        if self.body.trim().is_empty() {
            return Err(DomainError::Validation("Body is required".to_string()));
        }
        if Url::parse(&self.img_url).is_err() {
            return Err(DomainError::Validation(
                "Image URL is not a valid URL".to_string(),
            ));
        }
        Ok(())
    }
}

/// A post about to be persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub img_url: String,
}

impl NewPost {
    /// Assemble a post from a validated draft, stamping the creation
    /// date from the given instant.
    pub fn from_draft(author_id: i64, draft: PostDraft, now: DateTime<Utc>) -> Self {
        Self {
            author_id,
            title: draft.title,
            subtitle: draft.subtitle,
            date: publication_date(now),
            body: draft.body,
            img_url: draft.img_url,
        }
    }
}

/// Format an instant the way post dates are displayed, e.g.
/// "August 08, 2026".
pub fn publication_date(now: DateTime<Utc>) -> String {
    now.format("%B %d, %Y").to_string()
}
