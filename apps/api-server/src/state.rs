//! Application state - shared across all handlers.

use std::sync::Arc;

use migration::MigratorTrait;
use quill_core::domain::User;
use quill_core::ports::{
    CommentRepository, PasswordService, PostRepository, SessionService, UserRepository,
};
use quill_infra::auth::{Argon2PasswordService, SignedSessionService};
use quill_infra::database::{
    DatabaseConnections, SeaOrmCommentRepository, SeaOrmPostRepository, SeaOrmUserRepository,
};

use crate::config::AppConfig;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;

/// Shared application state. Handles are explicit dependencies passed
/// into each handler, not process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub sessions: Arc<dyn SessionService>,
    pub passwords: Arc<dyn PasswordService>,
    admin_email: Option<String>,
}

impl AppState {
    /// Connect the database, apply pending migrations, and wire the
    /// concrete adapters.
    pub async fn new(config: &AppConfig) -> Result<Self, sea_orm::DbErr> {
        let connections = DatabaseConnections::init(&config.database).await?;

        migration::Migrator::up(&connections.main, None).await?;
        tracing::info!("Database schema is up to date");

        let state = Self {
            users: Arc::new(SeaOrmUserRepository::new(connections.main.clone())),
            posts: Arc::new(SeaOrmPostRepository::new(connections.main.clone())),
            comments: Arc::new(SeaOrmCommentRepository::new(connections.main.clone())),
            sessions: Arc::new(SignedSessionService::new(config.session.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            admin_email: config.admin_email.clone(),
        };

        tracing::info!("Application state initialized");

        Ok(state)
    }

    /// Whether a registering email is provisioned with the admin
    /// capability.
    pub fn grants_admin(&self, email: &str) -> bool {
        self.admin_email.as_deref() == Some(email)
    }

    /// Resolve a validated session to a live user. A session whose
    /// user no longer exists resolves to unauthenticated, never an
    /// error.
    pub async fn resolve_actor(&self, identity: Option<&Identity>) -> AppResult<Option<User>> {
        match identity {
            Some(identity) => Ok(self.users.find_by_id(identity.user_id).await?),
            None => Ok(None),
        }
    }
}
