//! Router harness for route tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use super::{build_app, USER_ID_HEADER};
use crate::application::ports::outbound::{MembershipRepositoryPort, UserRepositoryPort};
use crate::application::services::password::hash_password;
use crate::application::services::{CreateGameRequest, GameService};
use crate::domain::entities::{Membership, User};
use crate::domain::value_objects::{GameId, MemberRole, UserId};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::SqliteRepository;
use crate::infrastructure::state::AppState;

pub const TEST_PASSWORD: &str = "password123";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    repo: SqliteRepository,
}

impl TestApp {
    pub async fn new() -> Self {
        let repo = SqliteRepository::new("sqlite::memory:").await.unwrap();
        let state = Arc::new(AppState::with_repository(AppConfig::for_tests(), repo.clone()));
        Self {
            router: build_app(state.clone()),
            state,
            repo,
        }
    }

    /// Account `<name>@example.com` with [`TEST_PASSWORD`]
    pub async fn user(&self, name: &str) -> UserId {
        let hash = hash_password(TEST_PASSWORD).await.unwrap();
        let user = User::new(name, &format!("{}@example.com", name), hash);
        self.repo.users().create(&user).await.unwrap();
        user.id
    }

    pub async fn game(&self, owner: UserId, name: &str) -> GameId {
        let request = CreateGameRequest {
            name: name.to_string(),
            ..Default::default()
        };
        self.state
            .game_service
            .create_game(owner, request)
            .await
            .unwrap()
            .id
    }

    pub async fn add_member(&self, game: GameId, user: UserId, role: &str) {
        let role = MemberRole::parse(role).unwrap();
        self.repo
            .memberships()
            .upsert(&Membership::new(game, user, role))
            .await
            .unwrap();
    }

    /// Send a JSON request, returning the status and the decoded body
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        user: Option<UserId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Send raw bytes with a content type
    pub async fn upload(
        &self,
        path: &str,
        user: UserId,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("PUT")
            .uri(path)
            .header(USER_ID_HEADER, user.to_string())
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(bytes))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }
}
