//! Table definitions, created on startup

use anyhow::{Context, Result};
use sqlx::SqlitePool;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL,
        updated_at TIMESTAMP NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS games (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        theme TEXT NOT NULL,
        mode TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL,
        updated_at TIMESTAMP NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS memberships (
        game_id TEXT NOT NULL,
        user_id TEXT NOT NULL,
        role TEXT NOT NULL,
        joined_at TIMESTAMP NOT NULL,
        PRIMARY KEY (game_id, user_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_memberships_user ON memberships (user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS invitations (
        token TEXT PRIMARY KEY,
        game_id TEXT NOT NULL,
        inviter_id TEXT NOT NULL,
        invitee_email TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL,
        expires_at_ms INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_invitations_email ON invitations (invitee_email)",
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id TEXT PRIMARY KEY,
        game_id TEXT NOT NULL,
        created_by TEXT NOT NULL,
        name TEXT NOT NULL,
        theme TEXT NOT NULL,
        fields TEXT NOT NULL,
        photo_url TEXT,
        created_at TIMESTAMP NOT NULL,
        updated_at TIMESTAMP NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_characters_game ON characters (game_id)",
];

pub(super) async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to initialize database schema")?;
    }
    tracing::debug!("Database schema initialized");
    Ok(())
}
