use serde::{Deserialize, Serialize};

use crate::application::services::{CreateCharacterRequest, UpdateCharacterRequest};
use crate::domain::entities::Character;
use crate::domain::services::GeneratedCharacter;
use crate::domain::value_objects::{CharacterField, Mode, Theme};

/// A sheet field as submitted by a client
///
/// The value is coerced to the category: numeric categories keep integers
/// (or integer strings) and drop anything else.
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterFieldDto {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl CharacterFieldDto {
    pub fn into_field(self) -> CharacterField {
        CharacterField::from_raw(self.name.trim(), &self.category, &self.value)
    }
}

/// Convert submitted fields, skipping ones without a name
pub fn into_fields(fields: Vec<CharacterFieldDto>) -> Vec<CharacterField> {
    fields
        .into_iter()
        .filter(|f| !f.name.trim().is_empty())
        .map(CharacterFieldDto::into_field)
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct CreateCharacterRequestDto {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<CharacterFieldDto>,
}

impl From<CreateCharacterRequestDto> for CreateCharacterRequest {
    fn from(dto: CreateCharacterRequestDto) -> Self {
        Self {
            name: dto.name,
            fields: into_fields(dto.fields),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCharacterRequestDto {
    pub name: Option<String>,
    pub fields: Option<Vec<CharacterFieldDto>>,
}

impl From<UpdateCharacterRequestDto> for UpdateCharacterRequest {
    fn from(dto: UpdateCharacterRequestDto) -> Self {
        Self {
            name: dto.name,
            fields: dto.fields.map(into_fields),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateCharacterRequestDto {
    /// Return a blank sheet instead of random values
    pub empty: bool,
}

#[derive(Debug, Serialize)]
pub struct CharacterResponseDto {
    pub id: String,
    pub game_id: String,
    pub created_by: String,
    pub name: String,
    pub theme: Theme,
    pub fields: Vec<CharacterField>,
    pub photo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Character> for CharacterResponseDto {
    fn from(c: Character) -> Self {
        Self {
            id: c.id.to_string(),
            game_id: c.game_id.to_string(),
            created_by: c.created_by.to_string(),
            name: c.name,
            theme: c.theme,
            fields: c.fields,
            photo_url: c.photo_url,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GeneratedCharacterResponseDto {
    pub name: String,
    pub theme: Theme,
    pub mode: Mode,
    pub fields: Vec<CharacterField>,
}

impl From<GeneratedCharacter> for GeneratedCharacterResponseDto {
    fn from(g: GeneratedCharacter) -> Self {
        Self {
            name: g.name,
            theme: g.theme,
            mode: g.mode,
            fields: g.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FieldCategory, FieldValue};
    use serde_json::json;

    #[test]
    fn test_submitted_fields_are_coerced() {
        let dto: CreateCharacterRequestDto = serde_json::from_value(json!({
            "name": "Mira",
            "fields": [
                { "name": "Strength", "category": "stat", "value": "15" },
                { "name": "Stealth", "category": "skill", "value": "sneaky" },
                { "name": "  ", "category": "stat", "value": 3 },
                { "name": "Appearance", "value": "Tall" }
            ]
        }))
        .unwrap();

        let request = CreateCharacterRequest::from(dto);
        assert_eq!(request.fields.len(), 3);
        assert_eq!(request.fields[0].value, FieldValue::Number(15));
        assert_eq!(request.fields[1].value, FieldValue::Empty);
        assert_eq!(request.fields[2].category, FieldCategory::Narrative);
        assert_eq!(request.fields[2].value, FieldValue::Text("Tall".to_string()));
    }
}
