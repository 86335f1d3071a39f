//! Combat Service - Per-game combat trackers held in memory
//!
//! Trackers are not persisted; a restart clears every encounter. Reading
//! requires membership, changing anything requires editor access.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use super::access::require_role;
use super::error::{ServiceError, ServiceResult};
use crate::application::ports::outbound::MembershipRepositoryPort;
use crate::domain::aggregates::{CombatTracker, NewParticipant};
use crate::domain::value_objects::{GameId, MemberRole, ParticipantId, UserId};

/// How a health update is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthChange {
    Set(i32),
    Adjust(i32),
}

#[async_trait]
pub trait CombatService: Send + Sync {
    /// Current encounter, a fresh one when none was started
    async fn get_state(&self, user: UserId, game_id: GameId) -> ServiceResult<CombatTracker>;

    async fn add_participant(
        &self,
        user: UserId,
        game_id: GameId,
        input: NewParticipant,
    ) -> ServiceResult<CombatTracker>;

    async fn remove_participant(
        &self,
        user: UserId,
        game_id: GameId,
        participant: ParticipantId,
    ) -> ServiceResult<CombatTracker>;

    async fn change_health(
        &self,
        user: UserId,
        game_id: GameId,
        participant: ParticipantId,
        change: HealthChange,
    ) -> ServiceResult<CombatTracker>;

    async fn roll_initiative(&self, user: UserId, game_id: GameId) -> ServiceResult<CombatTracker>;

    async fn start(&self, user: UserId, game_id: GameId) -> ServiceResult<CombatTracker>;

    async fn next_turn(&self, user: UserId, game_id: GameId) -> ServiceResult<CombatTracker>;

    async fn reset(&self, user: UserId, game_id: GameId) -> ServiceResult<CombatTracker>;

    /// Drop the encounter of a deleted game
    async fn discard(&self, game_id: GameId);
}

pub struct CombatServiceImpl {
    memberships: Arc<dyn MembershipRepositoryPort>,
    trackers: RwLock<HashMap<GameId, CombatTracker>>,
}

impl CombatServiceImpl {
    pub fn new(memberships: Arc<dyn MembershipRepositoryPort>) -> Self {
        Self {
            memberships,
            trackers: RwLock::new(HashMap::new()),
        }
    }

    /// Apply `f` to the game's tracker under the write lock.
    ///
    /// The tracker is left untouched when `f` fails.
    async fn mutate<F>(&self, user: UserId, game_id: GameId, f: F) -> ServiceResult<CombatTracker>
    where
        F: FnOnce(&mut CombatTracker) -> ServiceResult<()> + Send,
    {
        require_role(self.memberships.as_ref(), game_id, user, MemberRole::Editor).await?;

        let mut trackers = self.trackers.write().await;
        let tracker = trackers.entry(game_id).or_insert_with(CombatTracker::new);
        f(tracker)?;
        Ok(tracker.clone())
    }
}

#[async_trait]
impl CombatService for CombatServiceImpl {
    #[instrument(skip(self))]
    async fn get_state(&self, user: UserId, game_id: GameId) -> ServiceResult<CombatTracker> {
        require_role(self.memberships.as_ref(), game_id, user, MemberRole::Viewer).await?;
        let trackers = self.trackers.read().await;
        Ok(trackers.get(&game_id).cloned().unwrap_or_else(CombatTracker::new))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn add_participant(
        &self,
        user: UserId,
        game_id: GameId,
        input: NewParticipant,
    ) -> ServiceResult<CombatTracker> {
        self.mutate(user, game_id, |tracker| {
            let id = tracker.add_participant(&input).ok_or_else(|| {
                ServiceError::validation("A participant needs a name and a numeric health value")
            })?;
            debug!(participant_id = %id, "Added combat participant");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn remove_participant(
        &self,
        user: UserId,
        game_id: GameId,
        participant: ParticipantId,
    ) -> ServiceResult<CombatTracker> {
        self.mutate(user, game_id, |tracker| {
            let removed = tracker.remove_participant(participant)?;
            debug!(participant_id = %participant, "Removed combat participant {}", removed.name);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn change_health(
        &self,
        user: UserId,
        game_id: GameId,
        participant: ParticipantId,
        change: HealthChange,
    ) -> ServiceResult<CombatTracker> {
        self.mutate(user, game_id, |tracker| {
            let health = match change {
                HealthChange::Set(value) => tracker.set_health(participant, value)?,
                HealthChange::Adjust(delta) => tracker.adjust_health(participant, delta)?,
            };
            debug!(participant_id = %participant, health, "Updated health");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn roll_initiative(&self, user: UserId, game_id: GameId) -> ServiceResult<CombatTracker> {
        self.mutate(user, game_id, |tracker| {
            tracker.roll_initiative(&mut rand::thread_rng());
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn start(&self, user: UserId, game_id: GameId) -> ServiceResult<CombatTracker> {
        let tracker = self
            .mutate(user, game_id, |tracker| Ok(tracker.start()?))
            .await?;
        info!(game_id = %game_id, participants = tracker.participants().len(), "Combat started");
        Ok(tracker)
    }

    #[instrument(skip(self))]
    async fn next_turn(&self, user: UserId, game_id: GameId) -> ServiceResult<CombatTracker> {
        self.mutate(user, game_id, |tracker| {
            let current = tracker.advance_turn()?;
            debug!(participant_id = %current.id, "Turn passed to {}", current.name);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn reset(&self, user: UserId, game_id: GameId) -> ServiceResult<CombatTracker> {
        let tracker = self
            .mutate(user, game_id, |tracker| {
                tracker.reset();
                Ok(())
            })
            .await?;
        info!(game_id = %game_id, "Combat reset");
        Ok(tracker)
    }

    async fn discard(&self, game_id: GameId) {
        if self.trackers.write().await.remove(&game_id).is_some() {
            debug!(game_id = %game_id, "Discarded combat tracker");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{seed_user, TestContext};
    use crate::domain::aggregates::CombatError;
    use crate::domain::entities::{Game, Membership, User};
    use crate::domain::value_objects::{Mode, Theme};

    async fn seed_game(ctx: &TestContext, owner: &User) -> Game {
        let game = Game::new(owner.id, "Arena", Theme::Fantasy, Mode::Simple);
        ctx.games.create(&game).await.unwrap();
        ctx.memberships.upsert(&Membership::owner_of(&game)).await.unwrap();
        game
    }

    fn participant(name: &str, initiative: &str, health: &str) -> NewParticipant {
        NewParticipant {
            name: name.to_string(),
            initiative: initiative.to_string(),
            health: health.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_full_encounter() {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "gm").await;
        let game = seed_game(&ctx, &owner).await;
        let service = CombatServiceImpl::new(ctx.memberships.clone());

        service
            .add_participant(owner.id, game.id, participant("Goblin", "5", "7"))
            .await
            .unwrap();
        let state = service
            .add_participant(owner.id, game.id, participant("Hero", "15", "12"))
            .await
            .unwrap();
        assert_eq!(state.participants().len(), 2);

        let state = service.start(owner.id, game.id).await.unwrap();
        assert_eq!(state.current_participant().map(|p| p.name.as_str()), Some("Hero"));

        let goblin = state.participants()[1].id;
        let state = service
            .change_health(owner.id, game.id, goblin, HealthChange::Adjust(-20))
            .await
            .unwrap();
        assert_eq!(state.participant(goblin).map(|p| p.health), Some(0));

        service.next_turn(owner.id, game.id).await.unwrap();
        let state = service.next_turn(owner.id, game.id).await.unwrap();
        assert_eq!(state.round(), 2);
        assert_eq!(state.turn_index(), 0);

        let state = service.reset(owner.id, game.id).await.unwrap();
        assert!(!state.is_active());
        assert_eq!(state.participant(goblin).map(|p| p.health), Some(7));
    }

    #[tokio::test]
    async fn test_rejected_operations_keep_state() {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "gm").await;
        let game = seed_game(&ctx, &owner).await;
        let service = CombatServiceImpl::new(ctx.memberships.clone());

        assert!(matches!(
            service.start(owner.id, game.id).await,
            Err(ServiceError::Combat(CombatError::NoParticipants))
        ));
        assert!(matches!(
            service.next_turn(owner.id, game.id).await,
            Err(ServiceError::Combat(CombatError::NotActive))
        ));
        assert!(matches!(
            service
                .add_participant(owner.id, game.id, participant("", "1", "5"))
                .await,
            Err(ServiceError::Validation(_))
        ));

        let state = service.get_state(owner.id, game.id).await.unwrap();
        assert!(state.participants().is_empty());
        assert!(!state.is_active());
    }

    #[tokio::test]
    async fn test_viewer_reads_but_cannot_change() {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "gm").await;
        let viewer = seed_user(&ctx, "viewer").await;
        let game = seed_game(&ctx, &owner).await;
        ctx.memberships
            .upsert(&Membership::new(game.id, viewer.id, MemberRole::Viewer))
            .await
            .unwrap();
        let service = CombatServiceImpl::new(ctx.memberships.clone());

        assert!(service.get_state(viewer.id, game.id).await.is_ok());
        assert!(matches!(
            service
                .add_participant(viewer.id, game.id, participant("Orc", "3", "9"))
                .await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_trackers_are_per_game() {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "gm").await;
        let first = seed_game(&ctx, &owner).await;
        let second = seed_game(&ctx, &owner).await;
        let service = CombatServiceImpl::new(ctx.memberships.clone());

        service
            .add_participant(owner.id, first.id, participant("Orc", "3", "9"))
            .await
            .unwrap();
        assert!(service
            .get_state(owner.id, second.id)
            .await
            .unwrap()
            .participants()
            .is_empty());

        service.discard(first.id).await;
        assert!(service
            .get_state(owner.id, first.id)
            .await
            .unwrap()
            .participants()
            .is_empty());
    }
}
