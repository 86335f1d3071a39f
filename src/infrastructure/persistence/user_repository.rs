//! User repository implementation for SQLite

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::parse_id;
use crate::application::ports::outbound::UserRepositoryPort;
use crate::domain::entities::User;
use crate::domain::value_objects::UserId;

const COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, clause: &str, value: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = ?", COLUMNS, clause);
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to query user by {}", clause))?;

        row.map(|r| parse_user_row(&r)).transpose()
    }
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert user")?;
        Ok(())
    }

    async fn get(&self, id: UserId) -> Result<Option<User>> {
        self.fetch_one_where("id", &id.to_string()).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_one_where("email", email).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        self.fetch_one_where("username", username).await
    }

    async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            "UPDATE users SET username = ?, email = ?, password_hash = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update user")?;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete user")?;
        Ok(())
    }
}

fn parse_user_row(row: &SqliteRow) -> Result<User> {
    let id: String = row.try_get("id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(User {
        id: parse_id(&id, "user id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at,
        updated_at,
    })
}
