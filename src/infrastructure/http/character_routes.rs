//! Character sheet API routes

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use super::{parse_path_id, service_error, ActingUser};
use crate::application::dto::{
    CharacterResponseDto, CreateCharacterRequestDto, GenerateCharacterRequestDto,
    GeneratedCharacterResponseDto, UpdateCharacterRequestDto,
};
use crate::application::services::{CharacterService, PhotoUpload};
use crate::domain::value_objects::{CharacterId, GameId};
use crate::infrastructure::state::AppState;

pub async fn list_characters(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<CharacterResponseDto>>, (StatusCode, String)> {
    let id: GameId = parse_path_id(&id, "game")?;
    let characters = state
        .character_service
        .list_characters(user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(
        characters
            .into_iter()
            .map(CharacterResponseDto::from)
            .collect(),
    ))
}

pub async fn create_character(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
    Json(req): Json<CreateCharacterRequestDto>,
) -> Result<(StatusCode, Json<CharacterResponseDto>), (StatusCode, String)> {
    let id: GameId = parse_path_id(&id, "game")?;
    let character = state
        .character_service
        .create_character(user, id, req.into())
        .await
        .map_err(service_error)?;

    Ok((StatusCode::CREATED, Json(CharacterResponseDto::from(character))))
}

/// Roll a sheet for the game's theme; nothing is stored
pub async fn generate_character(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<GeneratedCharacterResponseDto>, (StatusCode, String)> {
    let id: GameId = parse_path_id(&id, "game")?;
    // An empty body rolls a full sheet
    let req: GenerateCharacterRequestDto = if body.is_empty() {
        GenerateCharacterRequestDto::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    };
    let generated = state
        .character_service
        .generate_character(user, id, req.empty)
        .await
        .map_err(service_error)?;

    Ok(Json(GeneratedCharacterResponseDto::from(generated)))
}

pub async fn get_character(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<Json<CharacterResponseDto>, (StatusCode, String)> {
    let id: CharacterId = parse_path_id(&id, "character")?;
    let character = state
        .character_service
        .get_character(user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(CharacterResponseDto::from(character)))
}

pub async fn update_character(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateCharacterRequestDto>,
) -> Result<Json<CharacterResponseDto>, (StatusCode, String)> {
    let id: CharacterId = parse_path_id(&id, "character")?;
    let character = state
        .character_service
        .update_character(user, id, req.into())
        .await
        .map_err(service_error)?;

    Ok(Json(CharacterResponseDto::from(character)))
}

pub async fn delete_character(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let id: CharacterId = parse_path_id(&id, "character")?;
    state
        .character_service
        .delete_character(user, id)
        .await
        .map_err(service_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Replace the character's photo with the raw request body
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CharacterResponseDto>, (StatusCode, String)> {
    let id: CharacterId = parse_path_id(&id, "character")?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let upload = PhotoUpload {
        bytes: body.to_vec(),
        content_type,
    };
    let character = state
        .character_service
        .upload_photo(user, id, upload)
        .await
        .map_err(service_error)?;

    Ok(Json(CharacterResponseDto::from(character)))
}

pub async fn remove_photo(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<Json<CharacterResponseDto>, (StatusCode, String)> {
    let id: CharacterId = parse_path_id(&id, "character")?;
    let character = state
        .character_service
        .remove_photo(user, id)
        .await
        .map_err(service_error)?;

    Ok(Json(CharacterResponseDto::from(character)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::application::services::MAX_PHOTO_BYTES;
    use crate::infrastructure::http::test_app::TestApp;

    #[tokio::test]
    async fn test_character_lifecycle() {
        let app = TestApp::new().await;
        let owner = app.user("gm").await;
        let game_id = app.game(owner, "Keep").await;

        let path = format!("/api/games/{}/characters", game_id);
        let (status, created) = app
            .request(
                "POST",
                &path,
                Some(owner),
                Some(json!({
                    "name": "Mira",
                    "fields": [{ "name": "Strength", "category": "stat", "value": "14" }]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["fields"][0]["value"], 14);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = app
            .request(
                "PUT",
                &format!("/api/characters/{}", id),
                Some(owner),
                Some(json!({ "name": "Mira the Bold" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Mira the Bold");
        assert_eq!(updated["fields"][0]["value"], 14);

        let (_, listed) = app.request("GET", &path, Some(owner), None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, _) = app
            .request("DELETE", &format!("/api/characters/{}", id), Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app
            .request("GET", &format!("/api/characters/{}", id), Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_viewer_reads_but_cannot_write() {
        let app = TestApp::new().await;
        let owner = app.user("gm").await;
        let viewer = app.user("watcher").await;
        let game_id = app.game(owner, "Keep").await;
        app.add_member(game_id, viewer, "viewer").await;

        let path = format!("/api/games/{}/characters", game_id);
        let (status, _) = app
            .request("POST", &path, Some(viewer), Some(json!({ "name": "Sneak" })))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .request("POST", &format!("{}/generate", path), Some(viewer), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, listed) = app.request("GET", &path, Some(viewer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn test_generate_without_body() {
        let app = TestApp::new().await;
        let owner = app.user("gm").await;
        let game_id = app.game(owner, "Keep").await;

        let (status, generated) = app
            .request(
                "POST",
                &format!("/api/games/{}/characters/generate", game_id),
                Some(owner),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!generated["name"].as_str().unwrap().is_empty());
        assert_eq!(generated["theme"], "theme-fantasy");
    }

    #[tokio::test]
    async fn test_photo_upload_and_removal() {
        let app = TestApp::new().await;
        let owner = app.user("gm").await;
        let game_id = app.game(owner, "Keep").await;
        let (_, created) = app
            .request(
                "POST",
                &format!("/api/games/{}/characters", game_id),
                Some(owner),
                Some(json!({ "name": "Mira" })),
            )
            .await;
        let photo_path = format!("/api/characters/{}/photo", created["id"].as_str().unwrap());

        let (status, _) = app
            .upload(&photo_path, owner, "text/plain", b"not an image".to_vec())
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .upload(&photo_path, owner, "image/png", vec![0; MAX_PHOTO_BYTES + 1])
            .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

        let (status, with_photo) = app
            .upload(&photo_path, owner, "image/png", b"png-bytes".to_vec())
            .await;
        assert_eq!(status, StatusCode::OK);
        let url = with_photo["photo_url"].as_str().unwrap();
        assert!(url.contains("/photos/"));
        assert!(url.ends_with(".png"));

        let (status, without) = app.request("DELETE", &photo_path, Some(owner), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(without["photo_url"].is_null());
    }
}
