//! Membership repository implementation for SQLite

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::parse_id;
use crate::application::ports::outbound::MembershipRepositoryPort;
use crate::domain::entities::Membership;
use crate::domain::value_objects::{GameId, MemberRole, UserId};

pub struct SqliteMembershipRepository {
    pool: SqlitePool,
}

impl SqliteMembershipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepositoryPort for SqliteMembershipRepository {
    async fn upsert(&self, membership: &Membership) -> Result<()> {
        sqlx::query(
            "INSERT INTO memberships (game_id, user_id, role, joined_at) VALUES (?, ?, ?, ?)
             ON CONFLICT (game_id, user_id) DO UPDATE SET role = excluded.role",
        )
        .bind(membership.game_id.to_string())
        .bind(membership.user_id.to_string())
        .bind(membership.role.as_str())
        .bind(membership.joined_at)
        .execute(&self.pool)
        .await
        .context("Failed to save membership")?;
        Ok(())
    }

    async fn get(&self, game_id: GameId, user_id: UserId) -> Result<Option<Membership>> {
        let row = sqlx::query("SELECT * FROM memberships WHERE game_id = ? AND user_id = ?")
            .bind(game_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query membership")?;

        row.map(|r| parse_membership_row(&r)).transpose()
    }

    async fn list_by_game(&self, game_id: GameId) -> Result<Vec<Membership>> {
        let rows = sqlx::query("SELECT * FROM memberships WHERE game_id = ? ORDER BY joined_at")
            .bind(game_id.to_string())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list memberships")?;

        rows.iter().map(parse_membership_row).collect()
    }

    async fn delete(&self, game_id: GameId, user_id: UserId) -> Result<()> {
        sqlx::query("DELETE FROM memberships WHERE game_id = ? AND user_id = ?")
            .bind(game_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete membership")?;
        Ok(())
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<()> {
        sqlx::query("DELETE FROM memberships WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete memberships of user")?;
        Ok(())
    }
}

fn parse_membership_row(row: &SqliteRow) -> Result<Membership> {
    let game_id: String = row.try_get("game_id")?;
    let user_id: String = row.try_get("user_id")?;
    let role: String = row.try_get("role")?;

    Ok(Membership {
        game_id: parse_id(&game_id, "game id")?,
        user_id: parse_id(&user_id, "user id")?,
        role: MemberRole::parse(&role)
            .with_context(|| format!("Unknown role in database: {}", role))?,
        joined_at: row.try_get("joined_at")?,
    })
}
