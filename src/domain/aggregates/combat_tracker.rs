//! Combat Tracker - Turn order, rounds and hit points for one encounter
//!
//! The tracker has two phases. During setup participants are added, removed
//! and given initiative. Starting combat fixes the turn order by descending
//! initiative; from then on only turns advance and health changes until the
//! encounter is reset back to setup.

use rand::Rng;
use thiserror::Error;

use crate::domain::value_objects::ParticipantId;

pub const DEFAULT_INITIATIVE: i32 = 0;
pub const DEFAULT_ARMOR_CLASS: i32 = 10;

/// An entity taking turns in combat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatParticipant {
    pub id: ParticipantId,
    pub name: String,
    pub initiative: i32,
    /// Always within `0..=max_health`
    pub health: i32,
    pub max_health: i32,
    pub armor_class: i32,
    /// Player-controlled rather than run by the game master
    pub is_player: bool,
}

impl CombatParticipant {
    pub fn is_down(&self) -> bool {
        self.health <= 0
    }
}

/// Raw form input for a new participant
///
/// Numeric fields arrive as text and are coerced when the participant is
/// added.
#[derive(Debug, Clone, Default)]
pub struct NewParticipant {
    pub name: String,
    pub initiative: String,
    pub health: String,
    pub armor_class: String,
    pub is_player: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatPhase {
    Setup,
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("Combat needs at least one participant")]
    NoParticipants,

    #[error("Combat has already started")]
    AlreadyActive,

    #[error("Combat has not started")]
    NotActive,

    #[error("Participants can only be removed during setup")]
    CombatInProgress,

    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),
}

/// State of a single encounter
#[derive(Debug, Clone)]
pub struct CombatTracker {
    participants: Vec<CombatParticipant>,
    turn_index: usize,
    round: u32,
    active: bool,
}

impl Default for CombatTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatTracker {
    pub fn new() -> Self {
        Self {
            participants: Vec::new(),
            turn_index: 0,
            round: 1,
            active: false,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn participants(&self) -> &[CombatParticipant] {
        &self.participants
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&CombatParticipant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> CombatPhase {
        if self.active {
            CombatPhase::Active
        } else {
            CombatPhase::Setup
        }
    }

    /// Whose turn it is, only while combat is active
    pub fn current_participant(&self) -> Option<&CombatParticipant> {
        if self.active {
            self.participants.get(self.turn_index)
        } else {
            None
        }
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Add a participant from form input.
    ///
    /// Returns `None` without changing anything when the name is blank or the
    /// health value does not parse. Unparsable initiative and armor class fall
    /// back to their defaults.
    pub fn add_participant(&mut self, input: &NewParticipant) -> Option<ParticipantId> {
        let name = input.name.trim();
        if name.is_empty() {
            return None;
        }
        let max_health = input.health.trim().parse::<i32>().ok()?.max(0);

        let participant = CombatParticipant {
            id: ParticipantId::new(),
            name: name.to_string(),
            initiative: parse_or(&input.initiative, DEFAULT_INITIATIVE),
            health: max_health,
            max_health,
            armor_class: parse_or(&input.armor_class, DEFAULT_ARMOR_CLASS),
            is_player: input.is_player,
        };
        let id = participant.id;
        self.participants.push(participant);
        Some(id)
    }

    pub fn remove_participant(
        &mut self,
        id: ParticipantId,
    ) -> Result<CombatParticipant, CombatError> {
        if self.active {
            return Err(CombatError::CombatInProgress);
        }
        let pos = self
            .position(id)
            .ok_or(CombatError::ParticipantNotFound(id))?;
        Ok(self.participants.remove(pos))
    }

    /// Give every participant an independent d20 initiative.
    ///
    /// Turn order is only recomputed when combat starts.
    pub fn roll_initiative(&mut self, rng: &mut impl Rng) {
        for participant in &mut self.participants {
            participant.initiative = rng.gen_range(1..=20);
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Fix turn order by descending initiative and begin round 1.
    ///
    /// The sort is stable: equal initiatives keep their existing order.
    pub fn start(&mut self) -> Result<(), CombatError> {
        if self.active {
            return Err(CombatError::AlreadyActive);
        }
        if self.participants.is_empty() {
            return Err(CombatError::NoParticipants);
        }

        self.participants
            .sort_by(|a, b| b.initiative.cmp(&a.initiative));
        self.turn_index = 0;
        self.round = 1;
        self.active = true;
        Ok(())
    }

    /// Move to the next participant, wrapping into a new round after the last.
    ///
    /// Participants at zero health still get their turn.
    pub fn advance_turn(&mut self) -> Result<&CombatParticipant, CombatError> {
        if !self.active {
            return Err(CombatError::NotActive);
        }

        if self.turn_index + 1 < self.participants.len() {
            self.turn_index += 1;
        } else {
            self.turn_index = 0;
            self.round += 1;
        }
        Ok(&self.participants[self.turn_index])
    }

    /// Back to setup with everyone at full health. Order and roster are kept.
    pub fn reset(&mut self) {
        self.active = false;
        self.turn_index = 0;
        self.round = 1;
        for participant in &mut self.participants {
            participant.health = participant.max_health;
        }
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Set health, clamped to `0..=max_health`. Returns the stored value.
    pub fn set_health(&mut self, id: ParticipantId, value: i32) -> Result<i32, CombatError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CombatError::ParticipantNotFound(id))?;

        participant.health = value.clamp(0, participant.max_health);
        Ok(participant.health)
    }

    /// Apply a positive (healing) or negative (damage) delta
    pub fn adjust_health(&mut self, id: ParticipantId, delta: i32) -> Result<i32, CombatError> {
        let current = self
            .participant(id)
            .map(|p| p.health)
            .ok_or(CombatError::ParticipantNotFound(id))?;
        self.set_health(id, current.saturating_add(delta))
    }

    fn position(&self, id: ParticipantId) -> Option<usize> {
        self.participants.iter().position(|p| p.id == id)
    }
}

fn parse_or(raw: &str, default: i32) -> i32 {
    raw.trim().parse().unwrap_or(default)
}
