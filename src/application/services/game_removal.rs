//! Game removal shared by game and account deletion
//!
//! Rows go first, in the repository's transaction. Photos and the
//! in-memory combat tracker are cleaned up afterwards on a best-effort basis.

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, warn};

use super::combat_service::CombatService;
use super::error::ServiceResult;
use crate::application::ports::outbound::{
    CharacterRepositoryPort, GameRepositoryPort, PhotoStoragePort,
};
use crate::domain::value_objects::GameId;

pub struct GameRemoval {
    games: Arc<dyn GameRepositoryPort>,
    characters: Arc<dyn CharacterRepositoryPort>,
    photos: Arc<dyn PhotoStoragePort>,
    combat: Arc<dyn CombatService>,
}

impl GameRemoval {
    pub fn new(
        games: Arc<dyn GameRepositoryPort>,
        characters: Arc<dyn CharacterRepositoryPort>,
        photos: Arc<dyn PhotoStoragePort>,
        combat: Arc<dyn CombatService>,
    ) -> Self {
        Self {
            games,
            characters,
            photos,
            combat,
        }
    }

    /// Delete a game with everything that belongs to it. Callers check access.
    pub async fn remove(&self, id: GameId) -> ServiceResult<()> {
        let photo_urls: Vec<String> = self
            .characters
            .list_by_game(id)
            .await
            .context("Failed to list characters of game")?
            .into_iter()
            .filter_map(|c| c.photo_url)
            .collect();

        self.games
            .delete(id)
            .await
            .with_context(|| format!("Failed to delete game {}", id))?;

        for url in &photo_urls {
            if let Err(e) = self.photos.remove(url).await {
                warn!(error = %e, "Failed to remove photo {}", url);
            }
        }
        self.combat.discard(id).await;

        debug!(game_id = %id, photos = photo_urls.len(), "Removed game data");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::MembershipRepositoryPort;
    use crate::application::services::test_support::{seed_user, TestContext};
    use crate::domain::aggregates::NewParticipant;
    use crate::domain::entities::{Character, Game, Membership};
    use crate::domain::value_objects::{Mode, Theme};

    #[tokio::test]
    async fn test_remove_cleans_photos_and_combat() {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "gm").await;
        let game = Game::new(owner.id, "Keep", Theme::Fantasy, Mode::Simple);
        ctx.games.create(&game).await.unwrap();
        ctx.memberships.upsert(&Membership::owner_of(&game)).await.unwrap();

        let url = ctx.photos.upload("keep/mira.png", b"png", "image/png").await.unwrap();
        let mut character = Character::new(game.id, owner.id, "Mira", Theme::Fantasy);
        character.photo_url = Some(url);
        ctx.characters.create(&character).await.unwrap();

        let orc = NewParticipant {
            name: "Orc".to_string(),
            health: "9".to_string(),
            ..Default::default()
        };
        ctx.combat.add_participant(owner.id, game.id, orc).await.unwrap();

        ctx.game_removal().remove(game.id).await.unwrap();

        assert!(ctx.games.get(game.id).await.unwrap().is_none());
        assert!(ctx.photos.objects.read().await.is_empty());
        // The tracker is gone, so a new member would see an empty one
        ctx.memberships.upsert(&Membership::owner_of(&game)).await.unwrap();
        let state = ctx.combat.get_state(owner.id, game.id).await.unwrap();
        assert!(state.participants().is_empty());
    }
}
