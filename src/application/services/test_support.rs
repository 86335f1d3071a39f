//! Shared fixtures for service tests

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{
    CharacterRepositoryPort, GameRepositoryPort, InvitationRepositoryPort,
    MembershipRepositoryPort, PhotoStoragePort, UserRepositoryPort, VerificationChannelPort,
};
use super::combat_service::CombatServiceImpl;
use super::game_removal::GameRemoval;
use crate::domain::entities::User;
use crate::infrastructure::persistence::SqliteRepository;

pub const TEST_CODE: &str = "123456";

/// Ports backed by a fresh in-memory database
pub struct TestContext {
    pub users: Arc<dyn UserRepositoryPort>,
    pub games: Arc<dyn GameRepositoryPort>,
    pub memberships: Arc<dyn MembershipRepositoryPort>,
    pub invitations: Arc<dyn InvitationRepositoryPort>,
    pub characters: Arc<dyn CharacterRepositoryPort>,
    pub photos: Arc<MemoryPhotoStorage>,
    pub verification: Arc<FixedCodeChannel>,
    pub combat: Arc<CombatServiceImpl>,
}

impl TestContext {
    pub async fn new() -> Self {
        let repo = SqliteRepository::new("sqlite::memory:").await.unwrap();
        let memberships: Arc<dyn MembershipRepositoryPort> = Arc::new(repo.memberships());
        Self {
            users: Arc::new(repo.users()),
            games: Arc::new(repo.games()),
            combat: Arc::new(CombatServiceImpl::new(memberships.clone())),
            memberships,
            invitations: Arc::new(repo.invitations()),
            characters: Arc::new(repo.characters()),
            photos: Arc::new(MemoryPhotoStorage::default()),
            verification: Arc::new(FixedCodeChannel::default()),
        }
    }

    pub fn game_removal(&self) -> Arc<GameRemoval> {
        Arc::new(GameRemoval::new(
            self.games.clone(),
            self.characters.clone(),
            self.photos.clone(),
            self.combat.clone(),
        ))
    }
}

/// Insert an account `<username>@example.com` without hashing a password
pub async fn seed_user(ctx: &TestContext, username: &str) -> User {
    let user = User::new(username, &format!("{}@example.com", username), "unused");
    ctx.users.create(&user).await.unwrap();
    user
}

#[derive(Default)]
pub struct MemoryPhotoStorage {
    pub objects: RwLock<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl PhotoStoragePort for MemoryPhotoStorage {
    async fn upload(&self, key: &str, bytes: &[u8], _content_type: &str) -> Result<String> {
        let url = format!("memory://{}", key);
        self.objects.write().await.insert(url.clone(), bytes.to_vec());
        Ok(url)
    }

    async fn remove(&self, url: &str) -> Result<()> {
        self.objects.write().await.remove(url);
        Ok(())
    }
}

/// Accepts [`TEST_CODE`] once for every address a code was sent to
#[derive(Default)]
pub struct FixedCodeChannel {
    pub sent: RwLock<Vec<String>>,
}

#[async_trait]
impl VerificationChannelPort for FixedCodeChannel {
    async fn send_code(&self, email: &str) -> Result<()> {
        self.sent.write().await.push(email.to_string());
        Ok(())
    }

    async fn verify_code(&self, email: &str, code: &str) -> Result<bool> {
        let mut sent = self.sent.write().await;
        match sent.iter().position(|e| e == email) {
            Some(index) if code == TEST_CODE => {
                sent.remove(index);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn purge_expired(&self) -> usize {
        0
    }
}
