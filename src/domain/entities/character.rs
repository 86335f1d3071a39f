//! Character entity - A character sheet belonging to a game

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{CharacterField, CharacterId, GameId, Theme, UserId};

/// A character sheet stored for a game
#[derive(Debug, Clone)]
pub struct Character {
    pub id: CharacterId,
    pub game_id: GameId,
    /// Member who created the sheet
    pub created_by: UserId,
    pub name: String,
    /// Theme the sheet was laid out for
    pub theme: Theme,
    pub fields: Vec<CharacterField>,
    /// Public URL of the uploaded photo
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Character {
    pub fn new(game_id: GameId, created_by: UserId, name: impl Into<String>, theme: Theme) -> Self {
        let now = Utc::now();
        Self {
            id: CharacterId::new(),
            game_id,
            created_by,
            name: name.into(),
            theme,
            fields: Vec::new(),
            photo_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_fields(mut self, fields: Vec<CharacterField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn field(&self, name: &str) -> Option<&CharacterField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FieldCategory, FieldValue};

    #[test]
    fn test_field_lookup_by_name() {
        let character = Character::new(GameId::new(), UserId::new(), "Mira", Theme::Fantasy)
            .with_fields(vec![
                CharacterField::new("Strength", FieldCategory::Stat, FieldValue::Number(12)),
                CharacterField::empty("Appearance", FieldCategory::Narrative),
            ]);

        assert_eq!(
            character.field("Strength").and_then(|f| f.value.as_number()),
            Some(12)
        );
        assert!(character.field("Dexterity").is_none());
        assert!(character.photo_url.is_none());
    }
}
