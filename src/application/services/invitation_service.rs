//! Invitation Service - Offering game membership by email
//!
//! An invitee is identified only by normalized email. There is at most one
//! pending invitation per (game, email), and addresses that already belong
//! to a member cannot be invited.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument};

use super::access::require_role;
use super::error::{ServiceError, ServiceResult};
use crate::application::ports::outbound::{
    GameRepositoryPort, InvitationRepositoryPort, MembershipRepositoryPort, UserRepositoryPort,
};
use crate::domain::entities::{looks_like_email, normalize_email, Invitation, Membership, User};
use crate::domain::value_objects::{GameId, MemberRole, UserId};

/// Request to invite someone to a game
#[derive(Debug, Clone)]
pub struct InviteRequest {
    pub email: String,
    pub role: MemberRole,
}

/// An invitation addressed to the caller, with the game's name
#[derive(Debug, Clone)]
pub struct PendingInvitation {
    pub invitation: Invitation,
    pub game_name: String,
}

#[async_trait]
pub trait InvitationService: Send + Sync {
    async fn invite(
        &self,
        inviter: UserId,
        game_id: GameId,
        request: InviteRequest,
    ) -> ServiceResult<Invitation>;

    /// Unexpired invitations for a game
    async fn list_for_game(&self, user: UserId, game_id: GameId) -> ServiceResult<Vec<Invitation>>;

    /// Unexpired invitations addressed to the caller's email
    async fn list_for_user(&self, user: UserId) -> ServiceResult<Vec<PendingInvitation>>;

    async fn accept(&self, user: UserId, token: &str) -> ServiceResult<Membership>;

    async fn decline(&self, user: UserId, token: &str) -> ServiceResult<()>;

    /// Withdraw an invitation; owner only
    async fn revoke(&self, user: UserId, token: &str) -> ServiceResult<()>;

    /// Remove invitations expired at `now`
    async fn purge_expired(&self, now: DateTime<Utc>) -> ServiceResult<u64>;
}

pub struct InvitationServiceImpl {
    invitations: Arc<dyn InvitationRepositoryPort>,
    memberships: Arc<dyn MembershipRepositoryPort>,
    games: Arc<dyn GameRepositoryPort>,
    users: Arc<dyn UserRepositoryPort>,
    ttl: Duration,
}

impl InvitationServiceImpl {
    pub fn new(
        invitations: Arc<dyn InvitationRepositoryPort>,
        memberships: Arc<dyn MembershipRepositoryPort>,
        games: Arc<dyn GameRepositoryPort>,
        users: Arc<dyn UserRepositoryPort>,
        ttl: Duration,
    ) -> Self {
        Self {
            invitations,
            memberships,
            games,
            users,
            ttl,
        }
    }

    async fn load_user(&self, id: UserId) -> ServiceResult<User> {
        self.users
            .get(id)
            .await
            .context("Failed to load user")?
            .ok_or(ServiceError::NotFound("User"))
    }

    async fn load_invitation(&self, token: &str) -> ServiceResult<Invitation> {
        self.invitations
            .get(token)
            .await
            .context("Failed to load invitation")?
            .ok_or(ServiceError::NotFound("Invitation"))
    }

    /// The invitation, provided it is addressed to `user`
    async fn load_addressed(&self, user: UserId, token: &str) -> ServiceResult<(User, Invitation)> {
        let account = self.load_user(user).await?;
        let invitation = self.load_invitation(token).await?;
        if !invitation.is_addressed_to(&account.email) {
            return Err(ServiceError::NotFound("Invitation"));
        }
        Ok((account, invitation))
    }

    async fn email_is_member(&self, game_id: GameId, email: &str) -> ServiceResult<bool> {
        let account = self
            .users
            .get_by_email(email)
            .await
            .context("Failed to look up invitee account")?;
        match account {
            Some(account) => Ok(self
                .memberships
                .get(game_id, account.id)
                .await
                .context("Failed to load membership")?
                .is_some()),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl InvitationService for InvitationServiceImpl {
    #[instrument(skip(self, request), fields(game_id = %game_id))]
    async fn invite(
        &self,
        inviter: UserId,
        game_id: GameId,
        request: InviteRequest,
    ) -> ServiceResult<Invitation> {
        require_role(self.memberships.as_ref(), game_id, inviter, MemberRole::Owner).await?;

        if request.role == MemberRole::Owner {
            return Err(ServiceError::validation("Invitations can grant editor or viewer access only"));
        }
        let email = normalize_email(&request.email);
        if !looks_like_email(&email) {
            return Err(ServiceError::validation("A valid email address is required"));
        }

        if self.email_is_member(game_id, &email).await? {
            return Err(ServiceError::conflict("That user is already a member of this game"));
        }
        let pending = self
            .invitations
            .find_pending(game_id, &email, Utc::now())
            .await
            .context("Failed to check pending invitations")?;
        if pending.is_some() {
            return Err(ServiceError::conflict(
                "An invitation is already pending for that email",
            ));
        }

        let invitation = Invitation::new(game_id, inviter, &email, request.role, self.ttl);
        self.invitations
            .create(&invitation)
            .await
            .context("Failed to create invitation")?;

        info!(game_id = %game_id, role = %invitation.role, "Invited {}", invitation.invitee_email);
        Ok(invitation)
    }

    #[instrument(skip(self))]
    async fn list_for_game(&self, user: UserId, game_id: GameId) -> ServiceResult<Vec<Invitation>> {
        require_role(self.memberships.as_ref(), game_id, user, MemberRole::Owner).await?;
        let now = Utc::now();
        let invitations = self
            .invitations
            .list_by_game(game_id)
            .await
            .context("Failed to list invitations")?;
        Ok(invitations
            .into_iter()
            .filter(|i| !i.is_expired(now))
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user: UserId) -> ServiceResult<Vec<PendingInvitation>> {
        let account = self.load_user(user).await?;
        let now = Utc::now();
        let invitations = self
            .invitations
            .list_by_email(&account.email)
            .await
            .context("Failed to list invitations")?;

        let mut pending = Vec::new();
        for invitation in invitations.into_iter().filter(|i| !i.is_expired(now)) {
            let game = self
                .games
                .get(invitation.game_id)
                .await
                .context("Failed to load invited game")?;
            if let Some(game) = game {
                pending.push(PendingInvitation {
                    invitation,
                    game_name: game.name,
                });
            }
        }
        debug!(user_id = %user, count = pending.len(), "Listed pending invitations");
        Ok(pending)
    }

    #[instrument(skip(self, token))]
    async fn accept(&self, user: UserId, token: &str) -> ServiceResult<Membership> {
        let (_, invitation) = self.load_addressed(user, token).await?;

        if invitation.is_expired(Utc::now()) {
            self.invitations
                .delete(token)
                .await
                .context("Failed to delete expired invitation")?;
            return Err(ServiceError::validation("This invitation has expired"));
        }

        let existing = self
            .memberships
            .get(invitation.game_id, user)
            .await
            .context("Failed to load membership")?;
        let membership = match existing {
            Some(membership) => membership,
            None => {
                let membership = Membership::new(invitation.game_id, user, invitation.role);
                self.memberships
                    .upsert(&membership)
                    .await
                    .context("Failed to create membership")?;
                membership
            }
        };

        self.invitations
            .delete(token)
            .await
            .context("Failed to delete accepted invitation")?;

        info!(game_id = %invitation.game_id, user_id = %user, role = %membership.role, "Invitation accepted");
        Ok(membership)
    }

    #[instrument(skip(self, token))]
    async fn decline(&self, user: UserId, token: &str) -> ServiceResult<()> {
        let (_, invitation) = self.load_addressed(user, token).await?;
        self.invitations
            .delete(token)
            .await
            .context("Failed to delete declined invitation")?;

        info!(game_id = %invitation.game_id, user_id = %user, "Invitation declined");
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn revoke(&self, user: UserId, token: &str) -> ServiceResult<()> {
        let invitation = self.load_invitation(token).await?;
        require_role(self.memberships.as_ref(), invitation.game_id, user, MemberRole::Owner).await?;
        self.invitations
            .delete(token)
            .await
            .context("Failed to delete revoked invitation")?;

        info!(game_id = %invitation.game_id, "Revoked invitation for {}", invitation.invitee_email);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self, now: DateTime<Utc>) -> ServiceResult<u64> {
        let removed = self
            .invitations
            .delete_expired(now)
            .await
            .context("Failed to purge expired invitations")?;
        if removed > 0 {
            info!(removed, "Purged expired invitations");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{seed_user, TestContext};
    use crate::domain::entities::Game;
    use crate::domain::value_objects::{Mode, Theme};

    fn service(ctx: &TestContext) -> InvitationServiceImpl {
        InvitationServiceImpl::new(
            ctx.invitations.clone(),
            ctx.memberships.clone(),
            ctx.games.clone(),
            ctx.users.clone(),
            Duration::hours(24),
        )
    }

    async fn seed_game(ctx: &TestContext, owner: &User) -> Game {
        let game = Game::new(owner.id, "Keep", Theme::Fantasy, Mode::Simple);
        ctx.games.create(&game).await.unwrap();
        ctx.memberships.upsert(&Membership::owner_of(&game)).await.unwrap();
        game
    }

    fn invite_request(email: &str, role: MemberRole) -> InviteRequest {
        InviteRequest {
            email: email.to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_invite_and_accept() {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "gm").await;
        let player = seed_user(&ctx, "player").await;
        let game = seed_game(&ctx, &owner).await;
        let service = service(&ctx);

        let invitation = service
            .invite(owner.id, game.id, invite_request(" Player@Example.com ", MemberRole::Editor))
            .await
            .unwrap();
        assert_eq!(invitation.invitee_email, "player@example.com");

        let pending = service.list_for_user(player.id).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].game_name, "Keep");

        let membership = service.accept(player.id, &invitation.token).await.unwrap();
        assert_eq!(membership.role, MemberRole::Editor);
        assert!(service.list_for_user(player.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_pending_invitation_rejected() {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "gm").await;
        let game = seed_game(&ctx, &owner).await;
        let service = service(&ctx);

        service
            .invite(owner.id, game.id, invite_request("new@example.com", MemberRole::Viewer))
            .await
            .unwrap();
        let again = service
            .invite(owner.id, game.id, invite_request("NEW@example.com", MemberRole::Editor))
            .await;
        assert!(matches!(again, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_existing_member_cannot_be_invited() {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "gm").await;
        let game = seed_game(&ctx, &owner).await;

        let result = service(&ctx)
            .invite(owner.id, game.id, invite_request("gm@example.com", MemberRole::Viewer))
            .await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_invalid_invitations_rejected() {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "gm").await;
        let viewer = seed_user(&ctx, "viewer").await;
        let game = seed_game(&ctx, &owner).await;
        ctx.memberships
            .upsert(&Membership::new(game.id, viewer.id, MemberRole::Viewer))
            .await
            .unwrap();
        let service = service(&ctx);

        assert!(matches!(
            service
                .invite(owner.id, game.id, invite_request("x@example.com", MemberRole::Owner))
                .await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            service
                .invite(owner.id, game.id, invite_request("not-an-email", MemberRole::Viewer))
                .await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            service
                .invite(viewer.id, game.id, invite_request("x@example.com", MemberRole::Viewer))
                .await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_accept_requires_matching_email() {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "gm").await;
        let intruder = seed_user(&ctx, "intruder").await;
        let game = seed_game(&ctx, &owner).await;
        let service = service(&ctx);

        let invitation = service
            .invite(owner.id, game.id, invite_request("player@example.com", MemberRole::Viewer))
            .await
            .unwrap();
        let result = service.accept(intruder.id, &invitation.token).await;
        assert!(matches!(result, Err(ServiceError::NotFound("Invitation"))));
    }

    #[tokio::test]
    async fn test_expired_invitation_cannot_be_accepted() {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "gm").await;
        let player = seed_user(&ctx, "player").await;
        let game = seed_game(&ctx, &owner).await;

        let stale = Invitation::new(
            game.id,
            owner.id,
            "player@example.com",
            MemberRole::Viewer,
            Duration::hours(-1),
        );
        ctx.invitations.create(&stale).await.unwrap();

        let result = service(&ctx).accept(player.id, &stale.token).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert!(ctx.memberships.get(game.id, player.id).await.unwrap().is_none());
        assert!(ctx.invitations.get(&stale.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_decline_revoke_and_purge() {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "gm").await;
        let player = seed_user(&ctx, "player").await;
        let game = seed_game(&ctx, &owner).await;
        let service = service(&ctx);

        let declined = service
            .invite(owner.id, game.id, invite_request("player@example.com", MemberRole::Viewer))
            .await
            .unwrap();
        service.decline(player.id, &declined.token).await.unwrap();

        let revoked = service
            .invite(owner.id, game.id, invite_request("other@example.com", MemberRole::Viewer))
            .await
            .unwrap();
        assert!(service.revoke(player.id, &revoked.token).await.is_err());
        service.revoke(owner.id, &revoked.token).await.unwrap();
        assert!(service.list_for_game(owner.id, game.id).await.unwrap().is_empty());

        let stale = Invitation::new(game.id, owner.id, "late@example.com", MemberRole::Viewer, Duration::hours(-2));
        ctx.invitations.create(&stale).await.unwrap();
        assert_eq!(service.purge_expired(Utc::now()).await.unwrap(), 1);
    }
}
