//! Invitation API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{parse_path_id, service_error, ActingUser};
use crate::application::dto::{InvitationResponseDto, InviteRequestDto, MembershipResponseDto};
use crate::application::services::{InvitationService, InviteRequest};
use crate::domain::value_objects::{GameId, MemberRole};
use crate::infrastructure::state::AppState;

/// Pending invitations of a game (owner only)
pub async fn list_game_invitations(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<InvitationResponseDto>>, (StatusCode, String)> {
    let id: GameId = parse_path_id(&id, "game")?;
    let invitations = state
        .invitation_service
        .list_for_game(user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(
        invitations
            .into_iter()
            .map(InvitationResponseDto::from)
            .collect(),
    ))
}

pub async fn invite(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
    Json(req): Json<InviteRequestDto>,
) -> Result<(StatusCode, Json<InvitationResponseDto>), (StatusCode, String)> {
    let id: GameId = parse_path_id(&id, "game")?;
    let role = MemberRole::parse(&req.role)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("Unknown role: {}", req.role)))?;

    let invitation = state
        .invitation_service
        .invite(
            user,
            id,
            InviteRequest {
                email: req.email,
                role,
            },
        )
        .await
        .map_err(service_error)?;

    Ok((StatusCode::CREATED, Json(InvitationResponseDto::from(invitation))))
}

/// Invitations addressed to the caller
pub async fn list_my_invitations(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
) -> Result<Json<Vec<InvitationResponseDto>>, (StatusCode, String)> {
    let pending = state
        .invitation_service
        .list_for_user(user)
        .await
        .map_err(service_error)?;

    Ok(Json(
        pending.into_iter().map(InvitationResponseDto::from).collect(),
    ))
}

pub async fn accept_invitation(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(token): Path<String>,
) -> Result<Json<MembershipResponseDto>, (StatusCode, String)> {
    let membership = state
        .invitation_service
        .accept(user, &token)
        .await
        .map_err(service_error)?;

    Ok(Json(MembershipResponseDto::from(membership)))
}

pub async fn decline_invitation(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(token): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .invitation_service
        .decline(user, &token)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_invitation(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(token): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .invitation_service
        .revoke(user, &token)
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
    async fn test_invite_accept_flow() {
        let app = TestApp::new().await;
        let owner = app.user("gm").await;
        let player = app.user("player").await;
        let game_id = app.game(owner, "Keep").await;

        let path = format!("/api/games/{}/invitations", game_id);
        let (status, invitation) = app
            .request(
                "POST",
                &path,
                Some(owner),
                Some(json!({ "email": "Player@example.com", "role": "editor" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(invitation["invitee_email"], "player@example.com");
        let token = invitation["token"].as_str().unwrap().to_string();

        let (status, _) = app
            .request(
                "POST",
                &path,
                Some(owner),
                Some(json!({ "email": "player@example.com" })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, mine) = app.request("GET", "/api/invitations", Some(player), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mine[0]["game_name"], "Keep");

        let (status, membership) = app
            .request(
                "POST",
                &format!("/api/invitations/{}/accept", token),
                Some(player),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(membership["role"], "editor");

        let (status, game) = app
            .request("GET", &format!("/api/games/{}", game_id), Some(player), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(game["role"], "editor");
    }

    #[tokio::test]
    async fn test_owner_role_cannot_be_offered() {
        let app = TestApp::new().await;
        let owner = app.user("gm").await;
        let game_id = app.game(owner, "Keep").await;

        let (status, _) = app
            .request(
                "POST",
                &format!("/api/games/{}/invitations", game_id),
                Some(owner),
                Some(json!({ "email": "someone@example.com", "role": "owner" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
