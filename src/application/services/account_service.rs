//! Account Service - Registration, credentials and profile
//!
//! Registering requires a one-time code sent to the email address first.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{info, instrument, warn};

use super::access::validate_name;
use super::error::{ServiceError, ServiceResult};
use super::game_removal::GameRemoval;
use super::password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
use crate::application::ports::outbound::{
    GameRepositoryPort, MembershipRepositoryPort, UserRepositoryPort, VerificationChannelPort,
};
use crate::domain::entities::{looks_like_email, normalize_email, User};
use crate::domain::value_objects::UserId;

/// Request to create an account
#[derive(Clone, Default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub verification_code: String,
}

/// Request to change the caller's password
#[derive(Clone, Default)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub password_confirmation: String,
}

#[async_trait]
pub trait AccountService: Send + Sync {
    /// Send a registration code to an address not yet in use
    async fn request_verification_code(&self, email: &str) -> ServiceResult<()>;

    async fn register(&self, request: RegisterRequest) -> ServiceResult<User>;

    /// Check credentials, returning the account
    async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User>;

    async fn get_profile(&self, user: UserId) -> ServiceResult<User>;

    async fn rename(&self, user: UserId, username: &str) -> ServiceResult<User>;

    async fn change_password(&self, user: UserId, request: ChangePasswordRequest) -> ServiceResult<()>;

    /// Delete the account, the games it owns and its memberships elsewhere
    async fn delete_account(&self, user: UserId) -> ServiceResult<()>;
}

pub struct AccountServiceImpl {
    users: Arc<dyn UserRepositoryPort>,
    games: Arc<dyn GameRepositoryPort>,
    memberships: Arc<dyn MembershipRepositoryPort>,
    verification: Arc<dyn VerificationChannelPort>,
    removal: Arc<GameRemoval>,
}

impl AccountServiceImpl {
    pub fn new(
        users: Arc<dyn UserRepositoryPort>,
        games: Arc<dyn GameRepositoryPort>,
        memberships: Arc<dyn MembershipRepositoryPort>,
        verification: Arc<dyn VerificationChannelPort>,
        removal: Arc<GameRemoval>,
    ) -> Self {
        Self {
            users,
            games,
            memberships,
            verification,
            removal,
        }
    }

    async fn load_user(&self, id: UserId) -> ServiceResult<User> {
        self.users
            .get(id)
            .await
            .context("Failed to load user")?
            .ok_or(ServiceError::NotFound("User"))
    }

    fn validate_email(email: &str) -> ServiceResult<String> {
        let email = normalize_email(email);
        if !looks_like_email(&email) {
            return Err(ServiceError::validation("A valid email address is required"));
        }
        Ok(email)
    }

    fn validate_username(username: &str) -> ServiceResult<String> {
        let username = validate_name("Username", username)?;
        if username.chars().any(char::is_whitespace) {
            return Err(ServiceError::validation("Username cannot contain spaces"));
        }
        Ok(username)
    }

    fn validate_new_password(password: &str, confirmation: &str) -> ServiceResult<()> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if password != confirmation {
            return Err(ServiceError::validation("Passwords do not match"));
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str) -> ServiceResult<()> {
        let existing = self
            .users
            .get_by_email(email)
            .await
            .context("Failed to look up email")?;
        if existing.is_some() {
            return Err(ServiceError::conflict("An account with this email already exists"));
        }
        Ok(())
    }

    async fn ensure_username_free(&self, username: &str, except: Option<UserId>) -> ServiceResult<()> {
        let existing = self
            .users
            .get_by_username(username)
            .await
            .context("Failed to look up username")?;
        match existing {
            Some(user) if Some(user.id) != except => {
                Err(ServiceError::conflict("This username is already taken"))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    #[instrument(skip(self, email))]
    async fn request_verification_code(&self, email: &str) -> ServiceResult<()> {
        let email = Self::validate_email(email)?;
        self.ensure_email_free(&email).await?;

        self.verification
            .send_code(&email)
            .await
            .context("Failed to send verification code")?;
        info!("Sent verification code to {}", email);
        Ok(())
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    async fn register(&self, request: RegisterRequest) -> ServiceResult<User> {
        let username = Self::validate_username(&request.username)?;
        let email = Self::validate_email(&request.email)?;
        Self::validate_new_password(&request.password, &request.password_confirmation)?;

        self.ensure_email_free(&email).await?;
        self.ensure_username_free(&username, None).await?;

        let verified = self
            .verification
            .verify_code(&email, request.verification_code.trim())
            .await
            .context("Failed to check verification code")?;
        if !verified {
            return Err(ServiceError::validation("Invalid or expired verification code"));
        }

        let hash = hash_password(&request.password).await?;
        let user = User::new(username, &email, hash);
        self.users
            .create(&user)
            .await
            .context("Failed to create user in repository")?;

        info!(user_id = %user.id, "Registered account: {}", user.username);
        Ok(user)
    }

    #[instrument(skip(self, email, password))]
    async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let user = self
            .users
            .get_by_email(&normalize_email(email))
            .await
            .context("Failed to look up account")?
            .ok_or(ServiceError::Unauthorized)?;

        if !verify_password(password, &user.password_hash).await? {
            warn!(user_id = %user.id, "Rejected login with wrong password");
            return Err(ServiceError::Unauthorized);
        }
        info!(user_id = %user.id, "Authenticated");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_profile(&self, user: UserId) -> ServiceResult<User> {
        self.load_user(user).await
    }

    #[instrument(skip(self))]
    async fn rename(&self, user: UserId, username: &str) -> ServiceResult<User> {
        let username = Self::validate_username(username)?;
        let mut account = self.load_user(user).await?;
        self.ensure_username_free(&username, Some(user)).await?;

        account.username = username;
        account.touch();
        self.users
            .update(&account)
            .await
            .context("Failed to update user in repository")?;

        info!(user_id = %user, "Renamed account to {}", account.username);
        Ok(account)
    }

    #[instrument(skip(self, request))]
    async fn change_password(&self, user: UserId, request: ChangePasswordRequest) -> ServiceResult<()> {
        let mut account = self.load_user(user).await?;
        if !verify_password(&request.current_password, &account.password_hash).await? {
            return Err(ServiceError::Unauthorized);
        }
        Self::validate_new_password(&request.new_password, &request.password_confirmation)?;

        account.password_hash = hash_password(&request.new_password).await?;
        account.touch();
        self.users
            .update(&account)
            .await
            .context("Failed to update user in repository")?;

        info!(user_id = %user, "Changed password");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_account(&self, user: UserId) -> ServiceResult<()> {
        let account = self.load_user(user).await?;

        let owned = self
            .games
            .list_owned_by(user)
            .await
            .context("Failed to list owned games")?;
        for game in &owned {
            self.removal.remove(game.id).await?;
        }
        self.memberships
            .delete_by_user(user)
            .await
            .context("Failed to delete memberships")?;
        self.users
            .delete(user)
            .await
            .context("Failed to delete user from repository")?;

        info!(user_id = %user, owned_games = owned.len(), "Deleted account: {}", account.username);
        Ok(())
    }
}
