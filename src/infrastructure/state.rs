//! Shared application state

use std::sync::Arc;

use anyhow::Result;

use crate::application::services::{
    AccountServiceImpl, CharacterServiceImpl, CombatServiceImpl, GameRemoval, GameServiceImpl,
    InvitationServiceImpl,
};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::SqliteRepository;
use crate::infrastructure::storage::LocalPhotoStorage;
use crate::infrastructure::verification::EmailVerificationChannel;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// Pending registration codes, purged by the cleanup worker
    pub verification: Arc<EmailVerificationChannel>,
    // Application services
    pub account_service: AccountServiceImpl,
    pub game_service: GameServiceImpl,
    pub invitation_service: InvitationServiceImpl,
    pub character_service: CharacterServiceImpl,
    /// Shared with game removal, which discards trackers of deleted games
    pub combat_service: Arc<CombatServiceImpl>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let repository = SqliteRepository::new(&config.database_url).await?;
        Ok(Self::with_repository(config, repository))
    }

    /// Wire the services around an already opened repository
    pub fn with_repository(config: AppConfig, repository: SqliteRepository) -> Self {
        let users = Arc::new(repository.users());
        let games = Arc::new(repository.games());
        let memberships = Arc::new(repository.memberships());
        let invitations = Arc::new(repository.invitations());
        let characters = Arc::new(repository.characters());

        let photos = Arc::new(LocalPhotoStorage::new(
            config.photo_dir.clone(),
            &config.public_base_url,
        ));
        let verification = Arc::new(EmailVerificationChannel::new(
            config.mail_webhook_url.clone(),
            chrono::Duration::minutes(config.verification_code_ttl_minutes),
        ));

        // Initialize application services
        let combat_service = Arc::new(CombatServiceImpl::new(memberships.clone()));
        let removal = Arc::new(GameRemoval::new(
            games.clone(),
            characters.clone(),
            photos.clone(),
            combat_service.clone(),
        ));

        let account_service = AccountServiceImpl::new(
            users.clone(),
            games.clone(),
            memberships.clone(),
            verification.clone(),
            removal.clone(),
        );
        let game_service =
            GameServiceImpl::new(games.clone(), memberships.clone(), users.clone(), removal);
        let invitation_service = InvitationServiceImpl::new(
            invitations,
            memberships.clone(),
            games.clone(),
            users,
            chrono::Duration::hours(config.invitation_ttl_hours),
        );
        let character_service =
            CharacterServiceImpl::new(characters, games, memberships, photos);

        Self {
            config,
            verification,
            account_service,
            game_service,
            invitation_service,
            character_service,
            combat_service,
        }
    }
}
