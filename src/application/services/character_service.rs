//! Character Service - Character sheets and their photos
//!
//! Members with editor access create and edit sheets; every member can read
//! them. A sheet is laid out for the theme of the game it belongs to.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::access::{require_role, validate_name};
use super::error::{ServiceError, ServiceResult};
use crate::application::ports::outbound::{
    CharacterRepositoryPort, GameRepositoryPort, MembershipRepositoryPort, PhotoStoragePort,
};
use crate::domain::entities::{Character, Game};
use crate::domain::services::{blank_character, generate_character, GeneratedCharacter};
use crate::domain::value_objects::{CharacterField, CharacterId, GameId, MemberRole, UserId};

/// Largest accepted photo upload
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Request to create a new character
#[derive(Debug, Clone, Default)]
pub struct CreateCharacterRequest {
    pub name: String,
    /// Starts from the game's blank sheet when empty
    pub fields: Vec<CharacterField>,
}

/// Request to update an existing character
#[derive(Debug, Clone, Default)]
pub struct UpdateCharacterRequest {
    pub name: Option<String>,
    pub fields: Option<Vec<CharacterField>>,
}

/// An uploaded image
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[async_trait]
pub trait CharacterService: Send + Sync {
    async fn list_characters(&self, user: UserId, game_id: GameId) -> ServiceResult<Vec<Character>>;

    async fn get_character(&self, user: UserId, id: CharacterId) -> ServiceResult<Character>;

    /// Generate a sheet for the game's theme and mode without storing it
    async fn generate_character(
        &self,
        user: UserId,
        game_id: GameId,
        empty: bool,
    ) -> ServiceResult<GeneratedCharacter>;

    async fn create_character(
        &self,
        user: UserId,
        game_id: GameId,
        request: CreateCharacterRequest,
    ) -> ServiceResult<Character>;

    async fn update_character(
        &self,
        user: UserId,
        id: CharacterId,
        request: UpdateCharacterRequest,
    ) -> ServiceResult<Character>;

    async fn delete_character(&self, user: UserId, id: CharacterId) -> ServiceResult<()>;

    /// Store a new photo, replacing any previous one
    async fn upload_photo(
        &self,
        user: UserId,
        id: CharacterId,
        upload: PhotoUpload,
    ) -> ServiceResult<Character>;

    async fn remove_photo(&self, user: UserId, id: CharacterId) -> ServiceResult<Character>;
}

pub struct CharacterServiceImpl {
    characters: Arc<dyn CharacterRepositoryPort>,
    games: Arc<dyn GameRepositoryPort>,
    memberships: Arc<dyn MembershipRepositoryPort>,
    photos: Arc<dyn PhotoStoragePort>,
}

impl CharacterServiceImpl {
    pub fn new(
        characters: Arc<dyn CharacterRepositoryPort>,
        games: Arc<dyn GameRepositoryPort>,
        memberships: Arc<dyn MembershipRepositoryPort>,
        photos: Arc<dyn PhotoStoragePort>,
    ) -> Self {
        Self {
            characters,
            games,
            memberships,
            photos,
        }
    }

    async fn load_game(&self, id: GameId) -> ServiceResult<Game> {
        self.games
            .get(id)
            .await
            .context("Failed to load game")?
            .ok_or(ServiceError::NotFound("Game"))
    }

    /// Load a character and check the caller's role in its game.
    ///
    /// Characters of games the caller does not belong to are reported as
    /// missing.
    async fn load_character(
        &self,
        user: UserId,
        id: CharacterId,
        required: MemberRole,
    ) -> ServiceResult<Character> {
        let character = self
            .characters
            .get(id)
            .await
            .context("Failed to load character")?
            .ok_or(ServiceError::NotFound("Character"))?;

        match require_role(self.memberships.as_ref(), character.game_id, user, required).await {
            Err(ServiceError::NotFound(_)) => Err(ServiceError::NotFound("Character")),
            Err(e) => Err(e),
            Ok(_) => Ok(character),
        }
    }

    async fn save(&self, character: &mut Character) -> ServiceResult<()> {
        character.touch();
        self.characters
            .update(character)
            .await
            .context("Failed to update character in repository")?;
        Ok(())
    }

    /// Best effort; a dangling object is only logged
    async fn discard_photo(&self, url: &str) {
        if let Err(e) = self.photos.remove(url).await {
            warn!(error = %e, "Failed to remove photo {}", url);
        }
    }

    /// Check size and type, returning the file extension to store under
    fn validate_photo(upload: &PhotoUpload) -> ServiceResult<&'static str> {
        if upload.bytes.is_empty() {
            return Err(ServiceError::validation("Photo is empty"));
        }
        if upload.bytes.len() > MAX_PHOTO_BYTES {
            return Err(ServiceError::validation("Photo cannot exceed 5 MB"));
        }
        photo_extension(&upload.content_type).ok_or_else(|| {
            ServiceError::validation("Photo must be a PNG, JPEG, GIF, WebP, AVIF or BMP image")
        })
    }
}

/// File extension for an accepted image type.
///
/// Only raster formats are stored; SVG and anything else that a browser
/// could run script from is refused.
fn photo_extension(content_type: &str) -> Option<&'static str> {
    let media_type = content_type.split(';').next().unwrap_or_default();
    match media_type.trim().to_ascii_lowercase().as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/avif" => Some("avif"),
        "image/bmp" => Some("bmp"),
        _ => None,
    }
}

#[async_trait]
impl CharacterService for CharacterServiceImpl {
    #[instrument(skip(self))]
    async fn list_characters(&self, user: UserId, game_id: GameId) -> ServiceResult<Vec<Character>> {
        require_role(self.memberships.as_ref(), game_id, user, MemberRole::Viewer).await?;
        debug!(game_id = %game_id, "Listing characters");
        Ok(self
            .characters
            .list_by_game(game_id)
            .await
            .context("Failed to list characters from repository")?)
    }

    #[instrument(skip(self))]
    async fn get_character(&self, user: UserId, id: CharacterId) -> ServiceResult<Character> {
        self.load_character(user, id, MemberRole::Viewer).await
    }

    #[instrument(skip(self))]
    async fn generate_character(
        &self,
        user: UserId,
        game_id: GameId,
        empty: bool,
    ) -> ServiceResult<GeneratedCharacter> {
        require_role(self.memberships.as_ref(), game_id, user, MemberRole::Editor).await?;
        let game = self.load_game(game_id).await?;

        let generated = generate_character(game.theme, game.mode, empty, &mut rand::thread_rng());
        debug!(game_id = %game_id, theme = %game.theme, "Generated character {}", generated.name);
        Ok(generated)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_character(
        &self,
        user: UserId,
        game_id: GameId,
        request: CreateCharacterRequest,
    ) -> ServiceResult<Character> {
        require_role(self.memberships.as_ref(), game_id, user, MemberRole::Editor).await?;
        let game = self.load_game(game_id).await?;
        let name = validate_name("Character name", &request.name)?;

        let fields = if request.fields.is_empty() {
            blank_character(game.theme, game.mode).fields
        } else {
            request.fields
        };
        let character = Character::new(game_id, user, name, game.theme).with_fields(fields);

        self.characters
            .create(&character)
            .await
            .context("Failed to create character in repository")?;

        info!(character_id = %character.id, game_id = %game_id, "Created character: {}", character.name);
        Ok(character)
    }

    #[instrument(skip(self, request), fields(character_id = %id))]
    async fn update_character(
        &self,
        user: UserId,
        id: CharacterId,
        request: UpdateCharacterRequest,
    ) -> ServiceResult<Character> {
        let mut character = self.load_character(user, id, MemberRole::Editor).await?;

        if let Some(name) = request.name {
            character.name = validate_name("Character name", &name)?;
        }
        if let Some(fields) = request.fields {
            character.fields = fields;
        }
        self.save(&mut character).await?;

        info!(character_id = %id, "Updated character: {}", character.name);
        Ok(character)
    }

    #[instrument(skip(self))]
    async fn delete_character(&self, user: UserId, id: CharacterId) -> ServiceResult<()> {
        let character = self.load_character(user, id, MemberRole::Editor).await?;

        self.characters
            .delete(id)
            .await
            .context("Failed to delete character from repository")?;
        if let Some(url) = &character.photo_url {
            self.discard_photo(url).await;
        }

        info!(character_id = %id, "Deleted character: {}", character.name);
        Ok(())
    }

    #[instrument(skip(self, upload), fields(size = upload.bytes.len(), content_type = %upload.content_type))]
    async fn upload_photo(
        &self,
        user: UserId,
        id: CharacterId,
        upload: PhotoUpload,
    ) -> ServiceResult<Character> {
        let extension = Self::validate_photo(&upload)?;
        let mut character = self.load_character(user, id, MemberRole::Editor).await?;

        let key = format!(
            "{}/{}-{}.{}",
            character.game_id,
            character.id,
            Uuid::new_v4().simple(),
            extension
        );
        let url = self
            .photos
            .upload(&key, &upload.bytes, upload.content_type.trim())
            .await
            .context("Failed to store photo")?;

        let previous = character.photo_url.replace(url.clone());
        if let Err(e) = self.save(&mut character).await {
            // Nothing references the new object yet
            self.discard_photo(&url).await;
            return Err(e);
        }
        if let Some(previous) = previous {
            self.discard_photo(&previous).await;
        }

        info!(character_id = %id, "Uploaded photo");
        Ok(character)
    }

    #[instrument(skip(self))]
    async fn remove_photo(&self, user: UserId, id: CharacterId) -> ServiceResult<Character> {
        let mut character = self.load_character(user, id, MemberRole::Editor).await?;

        if let Some(url) = character.photo_url.take() {
            self.save(&mut character).await?;
            self.discard_photo(&url).await;
            info!(character_id = %id, "Removed photo");
        }
        Ok(character)
    }
}
