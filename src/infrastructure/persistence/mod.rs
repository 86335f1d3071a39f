//! SQLite persistence adapters
//!
//! This module implements the repository ports on top of a shared SQLite
//! pool. Ids are stored as text, character fields as JSON text.

mod character_repository;
mod game_repository;
mod invitation_repository;
mod membership_repository;
mod schema;
mod user_repository;

pub use character_repository::SqliteCharacterRepository;
pub use game_repository::SqliteGameRepository;
pub use invitation_repository::SqliteInvitationRepository;
pub use membership_repository::SqliteMembershipRepository;
pub use user_repository::SqliteUserRepository;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Combined repository providing access to all domain repositories
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        // An in-memory database exists per connection, so it must not be pooled
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .with_context(|| format!("Failed to open database {}", database_url))?;

        schema::initialize_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn users(&self) -> SqliteUserRepository {
        SqliteUserRepository::new(self.pool.clone())
    }

    pub fn games(&self) -> SqliteGameRepository {
        SqliteGameRepository::new(self.pool.clone())
    }

    pub fn memberships(&self) -> SqliteMembershipRepository {
        SqliteMembershipRepository::new(self.pool.clone())
    }

    pub fn invitations(&self) -> SqliteInvitationRepository {
        SqliteInvitationRepository::new(self.pool.clone())
    }

    pub fn characters(&self) -> SqliteCharacterRepository {
        SqliteCharacterRepository::new(self.pool.clone())
    }
}

/// Parse an id column stored as text
pub(crate) fn parse_id<T>(raw: &str, column: &str) -> Result<T>
where
    T: std::str::FromStr<Err = uuid::Error>,
{
    raw.parse::<T>()
        .with_context(|| format!("Invalid {} in database: {}", column, raw))
}
