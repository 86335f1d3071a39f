//! Character repository implementation for SQLite

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::parse_id;
use crate::application::ports::outbound::CharacterRepositoryPort;
use crate::domain::entities::Character;
use crate::domain::value_objects::{CharacterField, CharacterId, GameId, Theme};

pub struct SqliteCharacterRepository {
    pool: SqlitePool,
}

impl SqliteCharacterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CharacterRepositoryPort for SqliteCharacterRepository {
    async fn create(&self, character: &Character) -> Result<()> {
        let fields_json = serde_json::to_string(&character.fields)?;

        sqlx::query(
            "INSERT INTO characters (id, game_id, created_by, name, theme, fields, photo_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(character.id.to_string())
        .bind(character.game_id.to_string())
        .bind(character.created_by.to_string())
        .bind(&character.name)
        .bind(character.theme.as_str())
        .bind(fields_json)
        .bind(&character.photo_url)
        .bind(character.created_at)
        .bind(character.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert character")?;
        Ok(())
    }

    async fn get(&self, id: CharacterId) -> Result<Option<Character>> {
        let row = sqlx::query("SELECT * FROM characters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query character")?;

        row.map(|r| parse_character_row(&r)).transpose()
    }

    async fn list_by_game(&self, game_id: GameId) -> Result<Vec<Character>> {
        let rows = sqlx::query("SELECT * FROM characters WHERE game_id = ? ORDER BY created_at")
            .bind(game_id.to_string())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list characters")?;

        rows.iter().map(parse_character_row).collect()
    }

    async fn update(&self, character: &Character) -> Result<()> {
        let fields_json = serde_json::to_string(&character.fields)?;

        sqlx::query(
            "UPDATE characters SET name = ?, theme = ?, fields = ?, photo_url = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&character.name)
        .bind(character.theme.as_str())
        .bind(fields_json)
        .bind(&character.photo_url)
        .bind(character.updated_at)
        .bind(character.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update character")?;
        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<()> {
        sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete character")?;
        Ok(())
    }
}

fn parse_character_row(row: &SqliteRow) -> Result<Character> {
    let id: String = row.try_get("id")?;
    let game_id: String = row.try_get("game_id")?;
    let created_by: String = row.try_get("created_by")?;
    let theme: String = row.try_get("theme")?;
    let fields_json: String = row.try_get("fields")?;

    let fields: Vec<CharacterField> =
        serde_json::from_str(&fields_json).context("Invalid character fields in database")?;

    Ok(Character {
        id: parse_id(&id, "character id")?,
        game_id: parse_id(&game_id, "game id")?,
        created_by: parse_id(&created_by, "creator id")?,
        name: row.try_get("name")?,
        theme: Theme::parse_lossy(&theme),
        fields,
        photo_url: row.try_get("photo_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
