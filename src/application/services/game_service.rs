//! Game Service - Campaign management and membership
//!
//! Creating a game makes the creator its owner. Ownership is never
//! transferred: the owner role cannot be assigned and the owner cannot leave.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::access::{require_role, validate_description, validate_name};
use super::error::{ServiceError, ServiceResult};
use super::game_removal::GameRemoval;
use crate::application::ports::outbound::{
    GameRepositoryPort, MembershipRepositoryPort, UserRepositoryPort,
};
use crate::domain::entities::{Game, Membership, User};
use crate::domain::value_objects::{GameId, MemberRole, Mode, Theme, UserId};

/// Request to create a new game
#[derive(Debug, Clone, Default)]
pub struct CreateGameRequest {
    pub name: String,
    pub description: String,
    pub theme: Theme,
    pub mode: Mode,
}

/// Request to update an existing game
#[derive(Debug, Clone, Default)]
pub struct UpdateGameRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub theme: Option<Theme>,
    pub mode: Option<Mode>,
}

/// A game together with the caller's role in it
#[derive(Debug, Clone)]
pub struct GameWithRole {
    pub game: Game,
    pub role: MemberRole,
}

/// A member of a game with account details
#[derive(Debug, Clone)]
pub struct MemberDetails {
    pub membership: Membership,
    pub username: String,
    pub email: String,
}

#[async_trait]
pub trait GameService: Send + Sync {
    async fn create_game(&self, owner: UserId, request: CreateGameRequest) -> ServiceResult<Game>;

    async fn get_game(&self, user: UserId, id: GameId) -> ServiceResult<GameWithRole>;

    /// Games the user belongs to, most recently updated first
    async fn list_games(&self, user: UserId) -> ServiceResult<Vec<GameWithRole>>;

    async fn update_game(
        &self,
        user: UserId,
        id: GameId,
        request: UpdateGameRequest,
    ) -> ServiceResult<GameWithRole>;

    /// Delete a game with its memberships, invitations and characters
    async fn delete_game(&self, user: UserId, id: GameId) -> ServiceResult<()>;

    async fn list_members(&self, user: UserId, id: GameId) -> ServiceResult<Vec<MemberDetails>>;

    async fn change_member_role(
        &self,
        user: UserId,
        id: GameId,
        member: UserId,
        role: MemberRole,
    ) -> ServiceResult<Membership>;

    async fn remove_member(&self, user: UserId, id: GameId, member: UserId) -> ServiceResult<()>;

    async fn leave_game(&self, user: UserId, id: GameId) -> ServiceResult<()>;
}

pub struct GameServiceImpl {
    games: Arc<dyn GameRepositoryPort>,
    memberships: Arc<dyn MembershipRepositoryPort>,
    users: Arc<dyn UserRepositoryPort>,
    removal: Arc<GameRemoval>,
}

impl GameServiceImpl {
    pub fn new(
        games: Arc<dyn GameRepositoryPort>,
        memberships: Arc<dyn MembershipRepositoryPort>,
        users: Arc<dyn UserRepositoryPort>,
        removal: Arc<GameRemoval>,
    ) -> Self {
        Self {
            games,
            memberships,
            users,
            removal,
        }
    }

    async fn load_game(&self, id: GameId) -> ServiceResult<Game> {
        self.games
            .get(id)
            .await
            .context("Failed to load game")?
            .ok_or(ServiceError::NotFound("Game"))
    }

    /// Membership of someone other than the owner, for role changes and removal
    async fn load_non_owner(&self, id: GameId, member: UserId) -> ServiceResult<Membership> {
        let membership = self
            .memberships
            .get(id, member)
            .await
            .context("Failed to load membership")?
            .ok_or(ServiceError::NotFound("Member"))?;
        if membership.role == MemberRole::Owner {
            return Err(ServiceError::validation("The game owner's membership cannot be changed"));
        }
        Ok(membership)
    }
}

#[async_trait]
impl GameService for GameServiceImpl {
    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_game(&self, owner: UserId, request: CreateGameRequest) -> ServiceResult<Game> {
        let name = validate_name("Game name", &request.name)?;
        validate_description(&request.description)?;

        let game = Game::new(owner, name, request.theme, request.mode)
            .with_description(request.description.trim());

        self.games
            .create(&game)
            .await
            .context("Failed to create game in repository")?;
        self.memberships
            .upsert(&Membership::owner_of(&game))
            .await
            .context("Failed to create owner membership")?;

        info!(game_id = %game.id, "Created new game: {}", game.name);
        Ok(game)
    }

    #[instrument(skip(self))]
    async fn get_game(&self, user: UserId, id: GameId) -> ServiceResult<GameWithRole> {
        let membership = require_role(self.memberships.as_ref(), id, user, MemberRole::Viewer).await?;
        let game = self.load_game(id).await?;
        Ok(GameWithRole {
            game,
            role: membership.role,
        })
    }

    #[instrument(skip(self))]
    async fn list_games(&self, user: UserId) -> ServiceResult<Vec<GameWithRole>> {
        debug!(user_id = %user, "Listing games");
        let games = self
            .games
            .list_for_user(user)
            .await
            .context("Failed to list games from repository")?;
        Ok(games
            .into_iter()
            .map(|(game, role)| GameWithRole { game, role })
            .collect())
    }

    #[instrument(skip(self, request), fields(game_id = %id))]
    async fn update_game(
        &self,
        user: UserId,
        id: GameId,
        request: UpdateGameRequest,
    ) -> ServiceResult<GameWithRole> {
        let membership = require_role(self.memberships.as_ref(), id, user, MemberRole::Editor).await?;
        let mut game = self.load_game(id).await?;

        if let Some(name) = request.name {
            game.name = validate_name("Game name", &name)?;
        }
        if let Some(description) = request.description {
            validate_description(&description)?;
            game.description = description.trim().to_string();
        }
        if let Some(theme) = request.theme {
            game.theme = theme;
        }
        if let Some(mode) = request.mode {
            game.mode = mode;
        }
        game.touch();

        self.games
            .update(&game)
            .await
            .context("Failed to update game in repository")?;

        info!(game_id = %id, "Updated game: {}", game.name);
        Ok(GameWithRole {
            game,
            role: membership.role,
        })
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, user: UserId, id: GameId) -> ServiceResult<()> {
        require_role(self.memberships.as_ref(), id, user, MemberRole::Owner).await?;
        self.removal.remove(id).await?;

        info!(game_id = %id, "Deleted game");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_members(&self, user: UserId, id: GameId) -> ServiceResult<Vec<MemberDetails>> {
        require_role(self.memberships.as_ref(), id, user, MemberRole::Viewer).await?;
        let memberships = self
            .memberships
            .list_by_game(id)
            .await
            .context("Failed to list memberships")?;

        let mut members = Vec::with_capacity(memberships.len());
        for membership in memberships {
            let account: Option<User> = self
                .users
                .get(membership.user_id)
                .await
                .context("Failed to load member account")?;
            // Accounts deleted out from under a membership are skipped
            if let Some(account) = account {
                members.push(MemberDetails {
                    membership,
                    username: account.username,
                    email: account.email,
                });
            }
        }
        Ok(members)
    }

    #[instrument(skip(self))]
    async fn change_member_role(
        &self,
        user: UserId,
        id: GameId,
        member: UserId,
        role: MemberRole,
    ) -> ServiceResult<Membership> {
        require_role(self.memberships.as_ref(), id, user, MemberRole::Owner).await?;
        if role == MemberRole::Owner {
            return Err(ServiceError::validation("The owner role cannot be assigned"));
        }

        let mut membership = self.load_non_owner(id, member).await?;
        membership.role = role;
        self.memberships
            .upsert(&membership)
            .await
            .context("Failed to update membership")?;

        info!(game_id = %id, member_id = %member, role = %role, "Changed member role");
        Ok(membership)
    }

    #[instrument(skip(self))]
    async fn remove_member(&self, user: UserId, id: GameId, member: UserId) -> ServiceResult<()> {
        require_role(self.memberships.as_ref(), id, user, MemberRole::Owner).await?;
        self.load_non_owner(id, member).await?;
        self.memberships
            .delete(id, member)
            .await
            .context("Failed to delete membership")?;

        info!(game_id = %id, member_id = %member, "Removed member");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn leave_game(&self, user: UserId, id: GameId) -> ServiceResult<()> {
        let membership = require_role(self.memberships.as_ref(), id, user, MemberRole::Viewer).await?;
        if membership.role == MemberRole::Owner {
            return Err(ServiceError::validation(
                "The owner cannot leave the game; delete it instead",
            ));
        }
        self.memberships
            .delete(id, user)
            .await
            .context("Failed to delete membership")?;

        info!(game_id = %id, user_id = %user, "Member left game");
        Ok(())
    }
}
