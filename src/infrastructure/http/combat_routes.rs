//! Combat tracker API routes
//!
//! Every route answers with the full tracker state so clients can redraw
//! the initiative list in one go.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{parse_path_id, service_error, ActingUser};
use crate::application::dto::{
    AddParticipantRequestDto, CombatStateResponseDto, HealthUpdateRequestDto,
};
use crate::application::services::CombatService;
use crate::domain::value_objects::{GameId, ParticipantId};
use crate::infrastructure::state::AppState;

type CombatResponse = Result<Json<CombatStateResponseDto>, (StatusCode, String)>;

pub async fn get_combat(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> CombatResponse {
    let id: GameId = parse_path_id(&id, "game")?;
    let tracker = state
        .combat_service
        .get_state(user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(CombatStateResponseDto::from(&tracker)))
}

pub async fn add_participant(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
    Json(req): Json<AddParticipantRequestDto>,
) -> CombatResponse {
    let id: GameId = parse_path_id(&id, "game")?;
    let tracker = state
        .combat_service
        .add_participant(user, id, req.into())
        .await
        .map_err(service_error)?;

    Ok(Json(CombatStateResponseDto::from(&tracker)))
}

pub async fn remove_participant(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path((id, participant_id)): Path<(String, String)>,
) -> CombatResponse {
    let id: GameId = parse_path_id(&id, "game")?;
    let participant_id: ParticipantId = parse_path_id(&participant_id, "participant")?;
    let tracker = state
        .combat_service
        .remove_participant(user, id, participant_id)
        .await
        .map_err(service_error)?;

    Ok(Json(CombatStateResponseDto::from(&tracker)))
}

/// Set or adjust a participant's health; exactly one of `set`/`delta`
pub async fn update_health(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path((id, participant_id)): Path<(String, String)>,
    Json(req): Json<HealthUpdateRequestDto>,
) -> CombatResponse {
    let id: GameId = parse_path_id(&id, "game")?;
    let participant_id: ParticipantId = parse_path_id(&participant_id, "participant")?;
    let change = req.into_change().ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "Provide either a health value or a change".to_string(),
        )
    })?;

    let tracker = state
        .combat_service
        .change_health(user, id, participant_id, change)
        .await
        .map_err(service_error)?;

    Ok(Json(CombatStateResponseDto::from(&tracker)))
}

pub async fn roll_initiative(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> CombatResponse {
    let id: GameId = parse_path_id(&id, "game")?;
    let tracker = state
        .combat_service
        .roll_initiative(user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(CombatStateResponseDto::from(&tracker)))
}

pub async fn start_combat(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> CombatResponse {
    let id: GameId = parse_path_id(&id, "game")?;
    let tracker = state
        .combat_service
        .start(user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(CombatStateResponseDto::from(&tracker)))
}

pub async fn next_turn(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> CombatResponse {
    let id: GameId = parse_path_id(&id, "game")?;
    let tracker = state
        .combat_service
        .next_turn(user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(CombatStateResponseDto::from(&tracker)))
}

pub async fn reset_combat(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> CombatResponse {
    let id: GameId = parse_path_id(&id, "game")?;
    let tracker = state
        .combat_service
        .reset(user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(CombatStateResponseDto::from(&tracker)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::domain::value_objects::{GameId, UserId};
    use crate::infrastructure::http::test_app::TestApp;

    async fn add(app: &TestApp, user: UserId, game: GameId, body: Value) -> (StatusCode, Value) {
        app.request(
            "POST",
            &format!("/api/games/{}/combat/participants", game),
            Some(user),
            Some(body),
        )
        .await
    }

    #[tokio::test]
    async fn test_encounter_over_http() {
        let app = TestApp::new().await;
        let owner = app.user("gm").await;
        let game_id = app.game(owner, "Keep").await;
        let base = format!("/api/games/{}/combat", game_id);

        let (status, state) = app.request("GET", &base, Some(owner), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["phase"], "setup");
        assert_eq!(state["participants"], json!([]));

        let mira = json!({ "name": "Mira", "initiative": 8, "health": 12, "is_player": true });
        add(&app, owner, game_id, mira).await;
        let orc = json!({ "name": "Orc", "initiative": "15", "health": "9" });
        let (status, state) = add(&app, owner, game_id, orc).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["participants"].as_array().unwrap().len(), 2);

        let (status, state) = app
            .request("POST", &format!("{}/start", base), Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["phase"], "active");
        assert_eq!(state["round"], 1);
        assert_eq!(state["participants"][0]["name"], "Orc");
        let orc = state["participants"][0]["id"].as_str().unwrap().to_string();
        assert_eq!(state["current_participant_id"], orc.as_str());

        let (status, state) = app
            .request(
                "PUT",
                &format!("{}/participants/{}/health", base, orc),
                Some(owner),
                Some(json!({ "delta": -20 })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["participants"][0]["health"], 0);
        assert_eq!(state["participants"][0]["is_down"], true);

        app.request("POST", &format!("{}/next", base), Some(owner), None).await;
        let (_, state) = app
            .request("POST", &format!("{}/next", base), Some(owner), None)
            .await;
        assert_eq!(state["round"], 2);
        assert_eq!(state["turn_index"], 0);

        let (status, _) = app
            .request("DELETE", &format!("{}/participants/{}", base, orc), Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, state) = app
            .request("POST", &format!("{}/reset", base), Some(owner), None)
            .await;
        assert_eq!(state["phase"], "setup");
        assert_eq!(state["participants"][0]["health"], 9);
    }

    #[tokio::test]
    async fn test_invalid_requests() {
        let app = TestApp::new().await;
        let owner = app.user("gm").await;
        let viewer = app.user("watcher").await;
        let game_id = app.game(owner, "Keep").await;
        app.add_member(game_id, viewer, "viewer").await;
        let base = format!("/api/games/{}/combat", game_id);

        let (status, _) = add(&app, owner, game_id, json!({ "name": "Ghost" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .request("POST", &format!("{}/start", base), Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = add(&app, viewer, game_id, json!({ "name": "Orc", "health": 9 })).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .request(
                "PUT",
                &format!("{}/participants/{}/health", base, uuid::Uuid::new_v4()),
                Some(owner),
                Some(json!({ "set": 3 })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .request(
                "PUT",
                &format!("{}/participants/{}/health", base, uuid::Uuid::new_v4()),
                Some(owner),
                Some(json!({})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
