//! Invitation entity - A pending offer to join a game
//!
//! Invitees are identified only by their normalized email address. The
//! invitee may not have an account yet; accepting requires an account whose
//! email matches.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::normalize_email;
use crate::domain::value_objects::{GameId, MemberRole, UserId};

#[derive(Debug, Clone)]
pub struct Invitation {
    /// Opaque token used to accept or decline
    pub token: String,
    pub game_id: GameId,
    pub inviter_id: UserId,
    pub invitee_email: String,
    /// Never [`MemberRole::Owner`]
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(
        game_id: GameId,
        inviter_id: UserId,
        invitee_email: &str,
        role: MemberRole,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            token: Uuid::new_v4().simple().to_string(),
            game_id,
            inviter_id,
            invitee_email: normalize_email(invitee_email),
            role,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_addressed_to(&self, email: &str) -> bool {
        self.invitee_email == normalize_email(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invitation_expiry() {
        let invitation = Invitation::new(
            GameId::new(),
            UserId::new(),
            "player@example.com",
            MemberRole::Viewer,
            Duration::hours(1),
        );

        assert!(!invitation.is_expired(Utc::now()));
        assert!(invitation.is_expired(Utc::now() + Duration::hours(2)));
        assert_eq!(invitation.token.len(), 32);
    }

    #[test]
    fn test_invitation_matches_normalized_email() {
        let invitation = Invitation::new(
            GameId::new(),
            UserId::new(),
            "Player@Example.com",
            MemberRole::Editor,
            Duration::days(7),
        );

        assert!(invitation.is_addressed_to(" player@example.COM"));
        assert!(!invitation.is_addressed_to("someone@example.com"));
    }
}
