//! Stat and skill templates for every theme and mode
//!
//! Each (theme, mode) pair has a fixed, ordered list of numeric fields. The
//! ranges only bound random generation; players may edit values freely
//! afterwards.

use crate::domain::value_objects::{FieldCategory, Mode, Theme};

/// A numeric field a theme puts on every sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub category: FieldCategory,
    pub min: i32,
    pub max: i32,
}

impl FieldDescriptor {
    const fn stat(name: &'static str, min: i32, max: i32) -> Self {
        Self {
            name,
            category: FieldCategory::Stat,
            min,
            max,
        }
    }

    const fn skill(name: &'static str, min: i32, max: i32) -> Self {
        Self {
            name,
            category: FieldCategory::Skill,
            min,
            max,
        }
    }
}

/// Template for a typed theme and mode
pub fn field_template(theme: Theme, mode: Mode) -> &'static [FieldDescriptor] {
    match (theme, mode) {
        (Theme::Fantasy, Mode::Simple) => FANTASY_SIMPLE,
        (Theme::Fantasy, Mode::Standard) => FANTASY_STANDARD,
        (Theme::Cyberpunk, Mode::Simple) => CYBERPUNK_SIMPLE,
        (Theme::Cyberpunk, Mode::Standard) => CYBERPUNK_STANDARD,
        (Theme::Stalker, Mode::Simple) => STALKER_SIMPLE,
        (Theme::Stalker, Mode::Standard) => STALKER_STANDARD,
        (Theme::SciFi, Mode::Simple) => SCIFI_SIMPLE,
        (Theme::SciFi, Mode::Standard) => SCIFI_STANDARD,
    }
}

/// Template lookup by wire ids.
///
/// Unknown themes use the fantasy template and unknown modes are simple.
pub fn get_field_template(theme: &str, mode: &str) -> &'static [FieldDescriptor] {
    field_template(Theme::parse_lossy(theme), Mode::parse_lossy(mode))
}

const FANTASY_SIMPLE: &[FieldDescriptor] = &[
    FieldDescriptor::stat("Strength", 8, 18),
    FieldDescriptor::stat("Dexterity", 8, 18),
    FieldDescriptor::stat("Constitution", 8, 18),
    FieldDescriptor::stat("Intelligence", 8, 18),
    FieldDescriptor::stat("Wisdom", 8, 18),
    FieldDescriptor::stat("Charisma", 8, 18),
    FieldDescriptor::skill("Athletics", 0, 5),
    FieldDescriptor::skill("Stealth", 0, 5),
    FieldDescriptor::skill("Perception", 0, 5),
];

const FANTASY_STANDARD: &[FieldDescriptor] = &[
    FieldDescriptor::stat("Strength", 3, 18),
    FieldDescriptor::stat("Dexterity", 3, 18),
    FieldDescriptor::stat("Constitution", 3, 18),
    FieldDescriptor::stat("Intelligence", 3, 18),
    FieldDescriptor::stat("Wisdom", 3, 18),
    FieldDescriptor::stat("Charisma", 3, 18),
    FieldDescriptor::skill("Acrobatics", 0, 10),
    FieldDescriptor::skill("Arcana", 0, 10),
    FieldDescriptor::skill("Athletics", 0, 10),
    FieldDescriptor::skill("Deception", 0, 10),
    FieldDescriptor::skill("History", 0, 10),
    FieldDescriptor::skill("Insight", 0, 10),
    FieldDescriptor::skill("Intimidation", 0, 10),
    FieldDescriptor::skill("Medicine", 0, 10),
    FieldDescriptor::skill("Perception", 0, 10),
    FieldDescriptor::skill("Persuasion", 0, 10),
    FieldDescriptor::skill("Stealth", 0, 10),
    FieldDescriptor::skill("Survival", 0, 10),
];

const CYBERPUNK_SIMPLE: &[FieldDescriptor] = &[
    FieldDescriptor::stat("INT", 2, 8),
    FieldDescriptor::stat("REF", 2, 8),
    FieldDescriptor::stat("DEX", 2, 8),
    FieldDescriptor::stat("TECH", 2, 8),
    FieldDescriptor::stat("COOL", 2, 8),
    FieldDescriptor::stat("BODY", 2, 8),
    FieldDescriptor::skill("Handgun", 0, 6),
    FieldDescriptor::skill("Brawling", 0, 6),
    FieldDescriptor::skill("Streetwise", 0, 6),
];

const CYBERPUNK_STANDARD: &[FieldDescriptor] = &[
    FieldDescriptor::stat("INT", 2, 8),
    FieldDescriptor::stat("REF", 2, 8),
    FieldDescriptor::stat("DEX", 2, 8),
    FieldDescriptor::stat("TECH", 2, 8),
    FieldDescriptor::stat("COOL", 2, 8),
    FieldDescriptor::stat("WILL", 2, 8),
    FieldDescriptor::stat("LUCK", 2, 8),
    FieldDescriptor::stat("MOVE", 2, 8),
    FieldDescriptor::stat("BODY", 2, 8),
    FieldDescriptor::stat("EMP", 2, 8),
    FieldDescriptor::skill("Athletics", 0, 10),
    FieldDescriptor::skill("Brawling", 0, 10),
    FieldDescriptor::skill("Concentration", 0, 10),
    FieldDescriptor::skill("Cybertech", 0, 10),
    FieldDescriptor::skill("Evasion", 0, 10),
    FieldDescriptor::skill("First Aid", 0, 10),
    FieldDescriptor::skill("Handgun", 0, 10),
    FieldDescriptor::skill("Interface", 0, 10),
    FieldDescriptor::skill("Melee Weapon", 0, 10),
    FieldDescriptor::skill("Perception", 0, 10),
    FieldDescriptor::skill("Stealth", 0, 10),
    FieldDescriptor::skill("Streetwise", 0, 10),
];

const STALKER_SIMPLE: &[FieldDescriptor] = &[
    FieldDescriptor::stat("Strength", 1, 10),
    FieldDescriptor::stat("Agility", 1, 10),
    FieldDescriptor::stat("Endurance", 1, 10),
    FieldDescriptor::stat("Perception", 1, 10),
    FieldDescriptor::stat("Willpower", 1, 10),
    FieldDescriptor::skill("Shooting", 0, 5),
    FieldDescriptor::skill("Survival", 0, 5),
    FieldDescriptor::skill("Anomaly Sense", 0, 5),
];

const STALKER_STANDARD: &[FieldDescriptor] = &[
    FieldDescriptor::stat("Strength", 1, 10),
    FieldDescriptor::stat("Agility", 1, 10),
    FieldDescriptor::stat("Endurance", 1, 10),
    FieldDescriptor::stat("Perception", 1, 10),
    FieldDescriptor::stat("Willpower", 1, 10),
    FieldDescriptor::stat("Intelligence", 1, 10),
    FieldDescriptor::stat("Charisma", 1, 10),
    FieldDescriptor::skill("Shooting", 0, 10),
    FieldDescriptor::skill("Melee", 0, 10),
    FieldDescriptor::skill("Survival", 0, 10),
    FieldDescriptor::skill("Anomaly Sense", 0, 10),
    FieldDescriptor::skill("Artifact Lore", 0, 10),
    FieldDescriptor::skill("Medicine", 0, 10),
    FieldDescriptor::skill("Scavenging", 0, 10),
    FieldDescriptor::skill("Stealth", 0, 10),
    FieldDescriptor::skill("Repair", 0, 10),
    FieldDescriptor::skill("Bartering", 0, 10),
];

const SCIFI_SIMPLE: &[FieldDescriptor] = &[
    FieldDescriptor::stat("Physique", 1, 10),
    FieldDescriptor::stat("Reflexes", 1, 10),
    FieldDescriptor::stat("Intellect", 1, 10),
    FieldDescriptor::stat("Presence", 1, 10),
    FieldDescriptor::skill("Piloting", 0, 5),
    FieldDescriptor::skill("Engineering", 0, 5),
    FieldDescriptor::skill("Xenology", 0, 5),
];

const SCIFI_STANDARD: &[FieldDescriptor] = &[
    FieldDescriptor::stat("Physique", 1, 10),
    FieldDescriptor::stat("Reflexes", 1, 10),
    FieldDescriptor::stat("Intellect", 1, 10),
    FieldDescriptor::stat("Presence", 1, 10),
    FieldDescriptor::stat("Resolve", 1, 10),
    FieldDescriptor::stat("Awareness", 1, 10),
    FieldDescriptor::skill("Piloting", 0, 10),
    FieldDescriptor::skill("Engineering", 0, 10),
    FieldDescriptor::skill("Xenology", 0, 10),
    FieldDescriptor::skill("Astrogation", 0, 10),
    FieldDescriptor::skill("Gunnery", 0, 10),
    FieldDescriptor::skill("Medicine", 0, 10),
    FieldDescriptor::skill("Hacking", 0, 10),
    FieldDescriptor::skill("Diplomacy", 0, 10),
    FieldDescriptor::skill("Zero-G Operations", 0, 10),
    FieldDescriptor::skill("Survival", 0, 10),
];
