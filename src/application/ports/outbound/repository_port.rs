//! Repository ports - Interfaces for data persistence
//!
//! These traits define the contracts that infrastructure repositories must implement.
//! Application services depend on these traits, not concrete implementations.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Character, Game, Invitation, Membership, User};
use crate::domain::value_objects::{CharacterId, GameId, MemberRole, UserId};

// =============================================================================
// User Repository Port
// =============================================================================

/// Repository port for account records
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    async fn create(&self, user: &User) -> Result<()>;

    async fn get(&self, id: UserId) -> Result<Option<User>>;

    /// Look up by normalized email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn update(&self, user: &User) -> Result<()>;

    async fn delete(&self, id: UserId) -> Result<()>;
}

// =============================================================================
// Game Repository Port
// =============================================================================

/// Repository port for Game records
#[async_trait]
pub trait GameRepositoryPort: Send + Sync {
    async fn create(&self, game: &Game) -> Result<()>;

    async fn get(&self, id: GameId) -> Result<Option<Game>>;

    /// Games the user is a member of, with the role held in each
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<(Game, MemberRole)>>;

    /// Games owned by the user
    async fn list_owned_by(&self, user_id: UserId) -> Result<Vec<Game>>;

    async fn update(&self, game: &Game) -> Result<()>;

    /// Delete a game along with its memberships, invitations and characters
    async fn delete(&self, id: GameId) -> Result<()>;
}

// =============================================================================
// Membership Repository Port
// =============================================================================

/// Repository port for (game, user) → role
#[async_trait]
pub trait MembershipRepositoryPort: Send + Sync {
    /// Insert or replace the membership for (game, user)
    async fn upsert(&self, membership: &Membership) -> Result<()>;

    async fn get(&self, game_id: GameId, user_id: UserId) -> Result<Option<Membership>>;

    async fn list_by_game(&self, game_id: GameId) -> Result<Vec<Membership>>;

    async fn delete(&self, game_id: GameId, user_id: UserId) -> Result<()>;

    /// Drop every membership a user holds
    async fn delete_by_user(&self, user_id: UserId) -> Result<()>;
}

// =============================================================================
// Invitation Repository Port
// =============================================================================

/// Repository port for pending invitations
#[async_trait]
pub trait InvitationRepositoryPort: Send + Sync {
    async fn create(&self, invitation: &Invitation) -> Result<()>;

    async fn get(&self, token: &str) -> Result<Option<Invitation>>;

    async fn list_by_game(&self, game_id: GameId) -> Result<Vec<Invitation>>;

    /// Invitations addressed to a normalized email
    async fn list_by_email(&self, email: &str) -> Result<Vec<Invitation>>;

    /// The unexpired invitation for (game, email), if any
    async fn find_pending(
        &self,
        game_id: GameId,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Invitation>>;

    async fn delete(&self, token: &str) -> Result<()>;

    /// Remove invitations expired at `now`, returning how many were removed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

// =============================================================================
// Character Repository Port
// =============================================================================

/// Repository port for Character sheets
#[async_trait]
pub trait CharacterRepositoryPort: Send + Sync {
    async fn create(&self, character: &Character) -> Result<()>;

    async fn get(&self, id: CharacterId) -> Result<Option<Character>>;

    async fn list_by_game(&self, game_id: GameId) -> Result<Vec<Character>>;

    async fn update(&self, character: &Character) -> Result<()>;

    async fn delete(&self, id: CharacterId) -> Result<()>;
}
