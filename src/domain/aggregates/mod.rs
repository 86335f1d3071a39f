//! Aggregates - Consistency boundaries over several entities

mod combat_tracker;

pub use combat_tracker::{
    CombatError, CombatParticipant, CombatPhase, CombatTracker, NewParticipant,
    DEFAULT_ARMOR_CLASS, DEFAULT_INITIATIVE,
};
