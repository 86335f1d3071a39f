//! User entity - An account holder

use chrono::{DateTime, Utc};

use crate::domain::value_objects::UserId;

/// A registered account
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Always stored normalized, see [`normalize_email`]
    pub email: String,
    /// PHC-formatted argon2 hash
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: &str,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username: username.into(),
            email: normalize_email(email),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// The single identity key used for accounts and invitations
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal shape check, delivery is what actually proves ownership
pub fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized_on_creation() {
        let user = User::new("gm", "  Game.Master@Example.COM ", "hash");
        assert_eq!(user.email, "game.master@example.com");
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("a@b.io"));
        assert!(!looks_like_email("no-at-sign"));
        assert!(!looks_like_email("a@localhost"));
        assert!(!looks_like_email("a b@c.de"));
    }
}
