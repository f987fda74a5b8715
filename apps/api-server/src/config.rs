//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::auth::SessionConfig;
use quill_infra::database::DatabaseConfig;

/// Default local file-backed store, used when DATABASE_URL is not set.
const DEFAULT_DATABASE_URL: &str = "sqlite://blog.db?mode=rwc";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Email granted the admin capability at registration time.
    pub admin_email: Option<String>,
    pub session: SessionConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        };

        let admin_email = env::var("ADMIN_EMAIL").ok();
        if admin_email.is_none() {
            tracing::warn!(
                "ADMIN_EMAIL not set. No account can be provisioned with the admin capability."
            );
        }

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            admin_email,
            session: SessionConfig::from_env(),
            database,
        }
    }
}
