//! Game and membership API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{parse_path_id, service_error, ActingUser};
use crate::application::dto::{
    ChangeRoleRequestDto, CreateGameRequestDto, GameResponseDto, MemberResponseDto,
    MembershipResponseDto, UpdateGameRequestDto,
};
use crate::application::services::{GameService, GameWithRole};
use crate::domain::value_objects::{GameId, MemberRole, UserId};
use crate::infrastructure::state::AppState;

/// List the caller's games
pub async fn list_games(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
) -> Result<Json<Vec<GameResponseDto>>, (StatusCode, String)> {
    let games = state
        .game_service
        .list_games(user)
        .await
        .map_err(service_error)?;

    Ok(Json(games.into_iter().map(GameResponseDto::from).collect()))
}

/// Create a new game owned by the caller
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Json(req): Json<CreateGameRequestDto>,
) -> Result<(StatusCode, Json<GameResponseDto>), (StatusCode, String)> {
    let game = state
        .game_service
        .create_game(user, req.into())
        .await
        .map_err(service_error)?;

    let response = GameResponseDto::from(GameWithRole {
        game,
        role: MemberRole::Owner,
    });
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_game(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<Json<GameResponseDto>, (StatusCode, String)> {
    let id: GameId = parse_path_id(&id, "game")?;
    let game = state
        .game_service
        .get_game(user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(GameResponseDto::from(game)))
}

pub async fn update_game(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateGameRequestDto>,
) -> Result<Json<GameResponseDto>, (StatusCode, String)> {
    let id: GameId = parse_path_id(&id, "game")?;
    let game = state
        .game_service
        .update_game(user, id, req.into())
        .await
        .map_err(service_error)?;

    Ok(Json(GameResponseDto::from(game)))
}

/// Delete a game with everything in it
pub async fn delete_game(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let id: GameId = parse_path_id(&id, "game")?;
    state
        .game_service
        .delete_game(user, id)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<MemberResponseDto>>, (StatusCode, String)> {
    let id: GameId = parse_path_id(&id, "game")?;
    let members = state
        .game_service
        .list_members(user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(members.into_iter().map(MemberResponseDto::from).collect()))
}

pub async fn change_member_role(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path((id, member)): Path<(String, String)>,
    Json(req): Json<ChangeRoleRequestDto>,
) -> Result<Json<MembershipResponseDto>, (StatusCode, String)> {
    let id: GameId = parse_path_id(&id, "game")?;
    let member: UserId = parse_path_id(&member, "user")?;
    let role = MemberRole::parse(&req.role)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("Unknown role: {}", req.role)))?;

    let membership = state
        .game_service
        .change_member_role(user, id, member, role)
        .await
        .map_err(service_error)?;

    Ok(Json(MembershipResponseDto::from(membership)))
}

pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path((id, member)): Path<(String, String)>,
) -> Result<StatusCode, (StatusCode, String)> {
    let id: GameId = parse_path_id(&id, "game")?;
    let member: UserId = parse_path_id(&member, "user")?;
    state
        .game_service
        .remove_member(user, id, member)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn leave_game(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let id: GameId = parse_path_id(&id, "game")?;
    state
        .game_service
        .leave_game(user, id)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::infrastructure::http::test_app::TestApp;

    #[tokio::test]
    async fn test_game_lifecycle() {
        let app = TestApp::new().await;
        let owner = app.user("gm").await;

        let (status, game) = app
            .request(
                "POST",
                "/api/games",
                Some(owner),
                Some(json!({ "name": "Night City", "theme": "theme-cyberpunk", "mode": "standard" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(game["theme"], "theme-cyberpunk");
        assert_eq!(game["mode"], "standard");
        assert_eq!(game["role"], "owner");
        let id = game["id"].as_str().unwrap().to_string();

        let (status, games) = app.request("GET", "/api/games", Some(owner), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(games.as_array().unwrap().len(), 1);

        let (status, updated) = app
            .request(
                "PUT",
                &format!("/api/games/{}", id),
                Some(owner),
                Some(json!({ "description": "Rain and neon" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["description"], "Rain and neon");
        assert_eq!(updated["name"], "Night City");

        let (status, _) = app
            .request("DELETE", &format!("/api/games/{}", id), Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app
            .request("GET", &format!("/api/games/{}", id), Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_requests_need_identity_and_valid_ids() {
        let app = TestApp::new().await;
        let owner = app.user("gm").await;

        let (status, _) = app.request("GET", "/api/games", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .request("GET", "/api/games/not-a-uuid", Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_members_and_roles() {
        let app = TestApp::new().await;
        let owner = app.user("gm").await;
        let player = app.user("player").await;
        let game_id = app.game(owner, "Keep").await;
        app.add_member(game_id, player, "viewer").await;

        let (status, members) = app
            .request("GET", &format!("/api/games/{}/members", game_id), Some(player), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(members.as_array().unwrap().len(), 2);

        let path = format!("/api/games/{}/members/{}", game_id, player);
        let (status, _) = app
            .request("PUT", &path, Some(player), Some(json!({ "role": "editor" })))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .request("PUT", &path, Some(owner), Some(json!({ "role": "wizard" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, membership) = app
            .request("PUT", &path, Some(owner), Some(json!({ "role": "editor" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(membership["role"], "editor");

        let (status, _) = app
            .request("POST", &format!("/api/games/{}/leave", game_id), Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app.request("DELETE", &path, Some(owner), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
