//! Application configuration

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL
    pub database_url: String,

    /// HTTP server port
    pub server_port: u16,

    /// Directory uploaded photos are written to
    pub photo_dir: PathBuf,
    /// Externally reachable base URL, used to build photo URLs
    pub public_base_url: String,

    /// How long an invitation stays valid
    pub invitation_ttl_hours: i64,
    /// How long a registration code stays valid
    pub verification_code_ttl_minutes: i64,
    /// Mail relay webhook; codes are only logged when unset
    pub mail_webhook_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://partybook.db?mode=rwc".to_string()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            photo_dir: env::var("PHOTO_DIR")
                .unwrap_or_else(|_| "./data/photos".to_string())
                .into(),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),

            invitation_ttl_hours: env::var("INVITATION_TTL_HOURS")
                .unwrap_or_else(|_| "168".to_string())
                .parse()
                .context("INVITATION_TTL_HOURS must be a whole number of hours")?,
            verification_code_ttl_minutes: env::var("VERIFICATION_CODE_TTL_MINUTES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("VERIFICATION_CODE_TTL_MINUTES must be a whole number of minutes")?,
            mail_webhook_url: env::var("MAIL_WEBHOOK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
        })
    }

    /// Configuration for tests: in-memory database and a scratch photo dir
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            server_port: 0,
            photo_dir: env::temp_dir().join(format!("partybook-test-{}", uuid::Uuid::new_v4())),
            public_base_url: "http://localhost:3000".to_string(),
            invitation_ttl_hours: 168,
            verification_code_ttl_minutes: 10,
            mail_webhook_url: None,
        }
    }
}
