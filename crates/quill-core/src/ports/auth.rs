//! Authentication ports: password hashing and session tokens.

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: i64,
    pub exp: i64,
}

/// Signed session token service. A token is issued after credential
/// verification and resolves back to a user id on later requests;
/// whether that id still maps to a live user is the caller's lookup.
pub trait SessionService: Send + Sync {
    /// Issue a session token for a user.
    fn issue(&self, user_id: i64) -> Result<String, AuthError>;

    /// Validate a token and return its claims.
    fn validate(&self, token: &str) -> Result<SessionClaims, AuthError>;

    /// Lifetime of newly issued tokens.
    fn ttl_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash. A mismatch is `Ok(false)`,
    /// never an error.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("No session credentials")]
    MissingSession,

    #[error("Hashing error: {0}")]
    Hashing(String),
}
