use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - represents a registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// A user about to be persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub is_admin: bool,
}

impl NewUser {
    /// Build a registration record. The display name is normalized to
    /// title case; the admin capability is decided by the caller at
    /// provisioning time.
    pub fn new(email: String, password_hash: String, name: &str, is_admin: bool) -> Self {
        Self {
            email,
            password_hash,
            name: title_case(name),
            is_admin,
        }
    }
}

/// Title-case a display name: first letter of each word upper,
/// the rest lower.
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
