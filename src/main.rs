//! Partybook Engine - Backend API for tabletop RPG campaign management
//!
//! The Engine is the backend server that:
//! - Stores accounts, games, invitations and character sheets in SQLite
//! - Generates themed characters and rolls dice
//! - Runs a combat tracker per game
//! - Serves uploaded character photos

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::ports::outbound::VerificationChannelPort;
use crate::application::services::InvitationService;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

/// How often expired invitations and codes are swept
const CLEANUP_INTERVAL_SECS: u64 = 3600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "partybook_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Partybook Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Database: {}", config.database_url);
    tracing::info!("  Photos: {}", config.photo_dir.display());
    if config.mail_webhook_url.is_none() {
        tracing::warn!("  MAIL_WEBHOOK_URL not set, verification codes will only be logged");
    }
    tokio::fs::create_dir_all(&config.photo_dir).await?;

    // Initialize application state
    let state = AppState::new(config).await?;
    let state = Arc::new(state);
    tracing::info!("Application state initialized");

    // Cleanup worker (drops expired invitations and verification codes)
    let cleanup_worker = {
        let state = state.clone();
        tokio::spawn(async move {
            tracing::info!("Starting cleanup worker");
            loop {
                match state.invitation_service.purge_expired(Utc::now()).await {
                    Ok(0) => {}
                    Ok(n) => tracing::info!("Removed {} expired invitations", n),
                    Err(e) => tracing::error!("Invitation cleanup failed: {}", e),
                }
                let codes = state.verification.purge_expired().await;
                if codes > 0 {
                    tracing::debug!("Removed {} expired verification codes", codes);
                }

                tokio::time::sleep(tokio::time::Duration::from_secs(CLEANUP_INTERVAL_SECS)).await;
            }
        })
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server_port));
    let app = http::build_app(state);

    // Start the server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping workers...");
            cleanup_worker.abort();
            tracing::info!("Workers stopped");
        }
    }

    Ok(())
}
