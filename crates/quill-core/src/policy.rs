//! Authorization policy for content-mutating operations.

use crate::domain::User;
use crate::error::DomainError;

/// The single gate in front of post creation, editing and deletion:
/// the actor must be authenticated and hold the admin capability.
/// Callers invoke this before touching any state.
pub fn ensure_admin(actor: Option<&User>) -> Result<&User, DomainError> {
    match actor {
        Some(user) if user.is_admin => Ok(user),
        _ => Err(DomainError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(is_admin: bool) -> User {
        User {
            id: 2,
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
            name: "Alice".to_string(),
            is_admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_passes() {
        let admin = user(true);
        assert!(ensure_admin(Some(&admin)).is_ok());
    }

    #[test]
    fn test_non_admin_forbidden() {
        let alice = user(false);
        assert!(matches!(
            ensure_admin(Some(&alice)),
            Err(DomainError::Forbidden)
        ));
    }

    #[test]
    fn test_unauthenticated_forbidden() {
        assert!(matches!(ensure_admin(None), Err(DomainError::Forbidden)));
    }
}
