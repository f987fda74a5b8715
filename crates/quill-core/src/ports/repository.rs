use async_trait::async_trait;

use crate::domain::{Comment, NewComment, NewPost, NewUser, Post, PostDraft, User};
use crate::error::RepoError;

/// User repository. Relationships are navigated by identifier lookup,
/// not by live object references.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user and return the stored row.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    /// Find a user by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError>;

    /// Find a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post and return the stored row.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Update the editable fields of a post. Creation date and author
    /// are immutable and left untouched.
    async fn update(&self, id: i64, draft: PostDraft) -> Result<Post, RepoError>;

    /// Find a post by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError>;

    /// All posts in insertion order, each with its author.
    async fn list(&self) -> Result<Vec<(Post, Option<User>)>, RepoError>;

    /// Delete a post and all of its comments as one atomic unit.
    async fn delete_with_comments(&self, id: i64) -> Result<(), RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a new comment and return the stored row.
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Comments on a post in insertion order, each with its author.
    async fn list_for_post(&self, post_id: i64)
    -> Result<Vec<(Comment, Option<User>)>, RepoError>;
}
