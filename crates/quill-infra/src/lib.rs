//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! SeaORM repositories, Argon2 password hashing, and signed session
//! tokens.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, SessionConfig, SignedSessionService};
pub use database::{DatabaseConfig, DatabaseConnections};
