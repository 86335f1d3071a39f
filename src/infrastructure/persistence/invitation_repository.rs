//! Invitation repository implementation for SQLite
//!
//! Expiry is kept as epoch milliseconds so that pending/expired filters can
//! be evaluated in SQL.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::parse_id;
use crate::application::ports::outbound::InvitationRepositoryPort;
use crate::domain::entities::Invitation;
use crate::domain::value_objects::{GameId, MemberRole};

pub struct SqliteInvitationRepository {
    pool: SqlitePool,
}

impl SqliteInvitationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationRepositoryPort for SqliteInvitationRepository {
    async fn create(&self, invitation: &Invitation) -> Result<()> {
        sqlx::query(
            "INSERT INTO invitations (token, game_id, inviter_id, invitee_email, role, created_at, expires_at_ms)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&invitation.token)
        .bind(invitation.game_id.to_string())
        .bind(invitation.inviter_id.to_string())
        .bind(&invitation.invitee_email)
        .bind(invitation.role.as_str())
        .bind(invitation.created_at)
        .bind(invitation.expires_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .context("Failed to insert invitation")?;
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Invitation>> {
        let row = sqlx::query("SELECT * FROM invitations WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query invitation")?;

        row.map(|r| parse_invitation_row(&r)).transpose()
    }

    async fn list_by_game(&self, game_id: GameId) -> Result<Vec<Invitation>> {
        let rows = sqlx::query("SELECT * FROM invitations WHERE game_id = ? ORDER BY created_at")
            .bind(game_id.to_string())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list invitations for game")?;

        rows.iter().map(parse_invitation_row).collect()
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Invitation>> {
        let rows =
            sqlx::query("SELECT * FROM invitations WHERE invitee_email = ? ORDER BY created_at")
                .bind(email)
                .fetch_all(&self.pool)
                .await
                .context("Failed to list invitations for email")?;

        rows.iter().map(parse_invitation_row).collect()
    }

    async fn find_pending(
        &self,
        game_id: GameId,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Invitation>> {
        let row = sqlx::query(
            "SELECT * FROM invitations
             WHERE game_id = ? AND invitee_email = ? AND expires_at_ms > ?
             LIMIT 1",
        )
        .bind(game_id.to_string())
        .bind(email)
        .bind(now.timestamp_millis())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to query pending invitation")?;

        row.map(|r| parse_invitation_row(&r)).transpose()
    }

    async fn delete(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM invitations WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .context("Failed to delete invitation")?;
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM invitations WHERE expires_at_ms <= ?")
            .bind(now.timestamp_millis())
            .execute(&self.pool)
            .await
            .context("Failed to delete expired invitations")?;
        Ok(result.rows_affected())
    }
}

fn parse_invitation_row(row: &SqliteRow) -> Result<Invitation> {
    let game_id: String = row.try_get("game_id")?;
    let inviter_id: String = row.try_get("inviter_id")?;
    let role: String = row.try_get("role")?;
    let expires_at_ms: i64 = row.try_get("expires_at_ms")?;

    let expires_at = Utc
        .timestamp_millis_opt(expires_at_ms)
        .single()
        .with_context(|| format!("Invalid invitation expiry in database: {}", expires_at_ms))?;

    Ok(Invitation {
        token: row.try_get("token")?,
        game_id: parse_id(&game_id, "game id")?,
        inviter_id: parse_id(&inviter_id, "inviter id")?,
        invitee_email: row.try_get("invitee_email")?,
        role: MemberRole::parse(&role)
            .with_context(|| format!("Unknown role in database: {}", role))?,
        created_at: row.try_get("created_at")?,
        expires_at,
    })
}
