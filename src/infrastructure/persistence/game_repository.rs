//! Game repository implementation for SQLite

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::parse_id;
use crate::application::ports::outbound::GameRepositoryPort;
use crate::domain::entities::Game;
use crate::domain::value_objects::{GameId, MemberRole, Mode, Theme, UserId};

pub struct SqliteGameRepository {
    pool: SqlitePool,
}

impl SqliteGameRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameRepositoryPort for SqliteGameRepository {
    async fn create(&self, game: &Game) -> Result<()> {
        sqlx::query(
            "INSERT INTO games (id, owner_id, name, description, theme, mode, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(game.id.to_string())
        .bind(game.owner_id.to_string())
        .bind(&game.name)
        .bind(&game.description)
        .bind(game.theme.as_str())
        .bind(game.mode.as_str())
        .bind(game.created_at)
        .bind(game.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert game")?;
        Ok(())
    }

    async fn get(&self, id: GameId) -> Result<Option<Game>> {
        let row = sqlx::query("SELECT * FROM games WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query game")?;

        row.map(|r| parse_game_row(&r)).transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<(Game, MemberRole)>> {
        let rows = sqlx::query(
            "SELECT g.*, m.role AS member_role FROM games g
             JOIN memberships m ON m.game_id = g.id
             WHERE m.user_id = ?
             ORDER BY g.updated_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list games for user")?;

        rows.iter()
            .map(|row| {
                let game = parse_game_row(row)?;
                let role: String = row.try_get("member_role")?;
                let role = MemberRole::parse(&role)
                    .with_context(|| format!("Unknown role in database: {}", role))?;
                Ok((game, role))
            })
            .collect()
    }

    async fn list_owned_by(&self, user_id: UserId) -> Result<Vec<Game>> {
        let rows = sqlx::query("SELECT * FROM games WHERE owner_id = ? ORDER BY created_at")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list owned games")?;

        rows.iter().map(parse_game_row).collect()
    }

    async fn update(&self, game: &Game) -> Result<()> {
        sqlx::query(
            "UPDATE games SET name = ?, description = ?, theme = ?, mode = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&game.name)
        .bind(&game.description)
        .bind(game.theme.as_str())
        .bind(game.mode.as_str())
        .bind(game.updated_at)
        .bind(game.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update game")?;
        Ok(())
    }

    async fn delete(&self, id: GameId) -> Result<()> {
        let id = id.to_string();
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        for table in ["characters", "invitations", "memberships"] {
            sqlx::query(&format!("DELETE FROM {} WHERE game_id = ?", table))
                .bind(&id)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to delete {} of game", table))?;
        }
        sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete game")?;

        tx.commit().await.context("Failed to commit game deletion")?;
        Ok(())
    }
}

fn parse_game_row(row: &SqliteRow) -> Result<Game> {
    let id: String = row.try_get("id")?;
    let owner_id: String = row.try_get("owner_id")?;
    let theme: String = row.try_get("theme")?;
    let mode: String = row.try_get("mode")?;

    Ok(Game {
        id: parse_id(&id, "game id")?,
        owner_id: parse_id(&owner_id, "owner id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        theme: Theme::parse_lossy(&theme),
        mode: Mode::parse_lossy(&mode),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
