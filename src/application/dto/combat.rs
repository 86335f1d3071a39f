use serde::{Deserialize, Serialize};

use crate::application::services::HealthChange;
use crate::domain::aggregates::{CombatParticipant, CombatPhase, CombatTracker, NewParticipant};

/// Form input for a participant; numbers may arrive as JSON numbers or text
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddParticipantRequestDto {
    pub name: String,
    pub initiative: serde_json::Value,
    pub health: serde_json::Value,
    pub armor_class: serde_json::Value,
    pub is_player: bool,
}

fn raw_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

impl From<AddParticipantRequestDto> for NewParticipant {
    fn from(dto: AddParticipantRequestDto) -> Self {
        Self {
            name: dto.name,
            initiative: raw_text(&dto.initiative),
            health: raw_text(&dto.health),
            armor_class: raw_text(&dto.armor_class),
            is_player: dto.is_player,
        }
    }
}

/// Exactly one of `set` or `delta`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HealthUpdateRequestDto {
    pub set: Option<i32>,
    pub delta: Option<i32>,
}

impl HealthUpdateRequestDto {
    pub fn into_change(self) -> Option<HealthChange> {
        match (self.set, self.delta) {
            (Some(value), None) => Some(HealthChange::Set(value)),
            (None, Some(delta)) => Some(HealthChange::Adjust(delta)),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ParticipantResponseDto {
    pub id: String,
    pub name: String,
    pub initiative: i32,
    pub health: i32,
    pub max_health: i32,
    pub armor_class: i32,
    pub is_player: bool,
    pub is_down: bool,
}

impl From<&CombatParticipant> for ParticipantResponseDto {
    fn from(p: &CombatParticipant) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            initiative: p.initiative,
            health: p.health,
            max_health: p.max_health,
            armor_class: p.armor_class,
            is_player: p.is_player,
            is_down: p.is_down(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CombatStateResponseDto {
    pub phase: &'static str,
    pub round: u32,
    pub turn_index: usize,
    pub current_participant_id: Option<String>,
    pub participants: Vec<ParticipantResponseDto>,
}

impl From<&CombatTracker> for CombatStateResponseDto {
    fn from(tracker: &CombatTracker) -> Self {
        Self {
            phase: match tracker.phase() {
                CombatPhase::Setup => "setup",
                CombatPhase::Active => "active",
            },
            round: tracker.round(),
            turn_index: tracker.turn_index(),
            current_participant_id: tracker.current_participant().map(|p| p.id.to_string()),
            participants: tracker.participants().iter().map(Into::into).collect(),
        }
    }
}
