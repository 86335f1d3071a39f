use serde::{Deserialize, Serialize};

use crate::domain::services::FieldDescriptor;
use crate::domain::value_objects::{DiceNotation, DiceRoll, FieldCategory, Mode, Theme};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TemplateQueryDto {
    pub theme: String,
    pub mode: String,
}

#[derive(Debug, Serialize)]
pub struct FieldDescriptorDto {
    pub name: &'static str,
    pub category: FieldCategory,
    pub min: i32,
    pub max: i32,
}

impl From<&FieldDescriptor> for FieldDescriptorDto {
    fn from(d: &FieldDescriptor) -> Self {
        Self {
            name: d.name,
            category: d.category,
            min: d.min,
            max: d.max,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TemplateResponseDto {
    pub theme: Theme,
    pub mode: Mode,
    pub fields: Vec<FieldDescriptorDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateFromTemplateRequestDto {
    pub theme: String,
    pub mode: String,
    pub empty: bool,
}

#[derive(Debug, Deserialize)]
pub struct DiceRollRequestDto {
    pub notation: String,
}

#[derive(Debug, Serialize)]
pub struct DiceRollResponseDto {
    pub notation: String,
    pub rolls: Vec<u32>,
    pub modifier: i32,
    pub total: i64,
    pub min: i64,
    pub max: i64,
}

impl DiceRollResponseDto {
    pub fn new(notation: &DiceNotation, roll: DiceRoll) -> Self {
        Self {
            notation: roll.notation,
            rolls: roll.rolls,
            modifier: roll.modifier,
            total: roll.total,
            min: notation.min_total(),
            max: notation.max_total(),
        }
    }
}
