//! Typed character sheet fields
//!
//! A character sheet is an ordered list of [`CharacterField`]s. Each field
//! declares its category, and the category decides which kind of value it
//! may hold: stats and skills are numeric, everything else is free text.
//! Raw input is coerced at the boundary instead of being stored as-is.

use serde::{Deserialize, Serialize};

/// What a field describes on the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    Stat,
    Skill,
    Ability,
    Equipment,
    Narrative,
}

impl FieldCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stat => "stat",
            Self::Skill => "skill",
            Self::Ability => "ability",
            Self::Equipment => "equipment",
            Self::Narrative => "narrative",
        }
    }

    /// Unknown categories become narrative text
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "stat" => Self::Stat,
            "skill" => Self::Skill,
            "ability" => Self::Ability,
            "equipment" => Self::Equipment,
            _ => Self::Narrative,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Stat | Self::Skill)
    }
}

/// Value held by a field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Empty,
    Number(i32),
    Text(String),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_number(&self) -> Option<i32> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Coerce raw JSON input into a value legal for `category`.
    ///
    /// Numeric categories accept integers or integer strings; anything else
    /// becomes empty. Text categories accept strings and stringify numbers.
    pub fn coerce(category: FieldCategory, raw: &serde_json::Value) -> Self {
        use serde_json::Value;

        if category.is_numeric() {
            let parsed = match raw {
                Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
                Value::String(s) => s.trim().parse::<i32>().ok(),
                _ => None,
            };
            return parsed.map(Self::Number).unwrap_or(Self::Empty);
        }

        match raw {
            Value::String(s) if s.is_empty() => Self::Empty,
            Value::String(s) => Self::Text(s.clone()),
            Value::Number(n) => Self::Text(n.to_string()),
            Value::Bool(b) => Self::Text(b.to_string()),
            _ => Self::Empty,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A single named entry on a character sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterField {
    pub name: String,
    pub category: FieldCategory,
    #[serde(default)]
    pub value: FieldValue,
}

impl CharacterField {
    pub fn new(name: impl Into<String>, category: FieldCategory, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            category,
            value,
        }
    }

    pub fn empty(name: impl Into<String>, category: FieldCategory) -> Self {
        Self::new(name, category, FieldValue::Empty)
    }

    /// Build a field from untrusted input, coercing the value to the category
    pub fn from_raw(name: impl Into<String>, category: &str, raw: &serde_json::Value) -> Self {
        let category = FieldCategory::parse_lossy(category);
        Self::new(name, category, FieldValue::coerce(category, raw))
    }
}
