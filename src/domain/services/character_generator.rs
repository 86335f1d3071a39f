//! Random character generation
//!
//! Rolls a character for a theme: a name from the theme's pool, every
//! template stat and skill drawn uniformly from its range, a handful of
//! abilities and equipment, and the four narrative fields left empty for the
//! player to fill in.

use rand::seq::SliceRandom;
use rand::Rng;

use super::field_templates::field_template;
use crate::domain::value_objects::{CharacterField, FieldCategory, FieldValue, Mode, Theme};

/// Narrative fields appended to every sheet, always empty on creation
pub const NARRATIVE_FIELDS: [&str; 4] = [
    "Appearance",
    "Distinguishing Mark",
    "Background & Personality",
    "Habits & Hobbies",
];

const ABILITY_COUNT: (usize, usize) = (1, 3);
const EQUIPMENT_COUNT: (usize, usize) = (2, 5);

/// A freshly rolled (or blank) sheet, not yet saved anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCharacter {
    pub name: String,
    pub theme: Theme,
    pub mode: Mode,
    pub fields: Vec<CharacterField>,
}

impl GeneratedCharacter {
    pub fn fields_in(&self, category: FieldCategory) -> impl Iterator<Item = &CharacterField> {
        self.fields.iter().filter(move |f| f.category == category)
    }
}

/// Name, ability and equipment pools for a theme
pub struct ThemePools {
    pub names: &'static [&'static str],
    /// (name, short description)
    pub abilities: &'static [(&'static str, &'static str)],
    /// (name, short description)
    pub equipment: &'static [(&'static str, &'static str)],
}

pub fn theme_pools(theme: Theme) -> &'static ThemePools {
    match theme {
        Theme::Fantasy => &FANTASY_POOLS,
        Theme::Cyberpunk => &CYBERPUNK_POOLS,
        Theme::Stalker => &STALKER_POOLS,
        Theme::SciFi => &SCIFI_POOLS,
    }
}

/// Generate a character in the default (simple) mode from a theme id.
///
/// Unknown themes silently use fantasy. With `empty` set the result is a
/// blank sheet in the theme's shape.
pub fn generate_random_character(theme: &str, empty: bool) -> GeneratedCharacter {
    generate_character(
        Theme::parse_lossy(theme),
        Mode::default(),
        empty,
        &mut rand::thread_rng(),
    )
}

pub fn generate_character(
    theme: Theme,
    mode: Mode,
    empty: bool,
    rng: &mut impl Rng,
) -> GeneratedCharacter {
    if empty {
        return blank_character(theme, mode);
    }

    let pools = theme_pools(theme);
    let name = pools.names.choose(rng).copied().unwrap_or_default().to_string();

    let mut fields: Vec<CharacterField> = field_template(theme, mode)
        .iter()
        .map(|d| {
            CharacterField::new(d.name, d.category, FieldValue::Number(rng.gen_range(d.min..=d.max)))
        })
        .collect();

    fields.extend(pick(rng, pools.abilities, ABILITY_COUNT, FieldCategory::Ability));
    fields.extend(pick(rng, pools.equipment, EQUIPMENT_COUNT, FieldCategory::Equipment));
    fields.extend(narrative_fields());

    GeneratedCharacter {
        name,
        theme,
        mode,
        fields,
    }
}

/// Template stats and skills plus the narrative fields, all empty
pub fn blank_character(theme: Theme, mode: Mode) -> GeneratedCharacter {
    let fields = field_template(theme, mode)
        .iter()
        .map(|d| CharacterField::empty(d.name, d.category))
        .chain(narrative_fields())
        .collect();

    GeneratedCharacter {
        name: String::new(),
        theme,
        mode,
        fields,
    }
}

fn narrative_fields() -> impl Iterator<Item = CharacterField> {
    NARRATIVE_FIELDS
        .into_iter()
        .map(|name| CharacterField::empty(name, FieldCategory::Narrative))
}

fn pick(
    rng: &mut impl Rng,
    pool: &'static [(&'static str, &'static str)],
    (min, max): (usize, usize),
    category: FieldCategory,
) -> Vec<CharacterField> {
    let count = rng.gen_range(min..=max).min(pool.len());
    pool.choose_multiple(rng, count)
        .map(|(name, description)| {
            CharacterField::new(*name, category, FieldValue::Text(description.to_string()))
        })
        .collect()
}

static FANTASY_POOLS: ThemePools = ThemePools {
    names: &[
        "Aelar Moonwhisper",
        "Brenna Ironfoot",
        "Cedric Thornwood",
        "Daria Ashvale",
        "Eldrin Starbloom",
        "Fiora Quickwater",
        "Garrick Stonehelm",
        "Isolde Ravenmere",
        "Torvin Emberforge",
        "Lyra Dawnsong",
    ],
    abilities: &[
        ("Darkvision", "See in dim light as if it were bright"),
        ("Second Wind", "Recover a burst of stamina once per rest"),
        ("Arcane Spark", "Conjure a small flame or light at will"),
        ("Sneak Attack", "Extra damage against distracted foes"),
        ("Lay on Hands", "Heal wounds with a touch"),
        ("Beast Speech", "Speak simply with animals"),
        ("Battle Cry", "Embolden nearby allies"),
        ("Keen Tracker", "Follow trails others cannot see"),
    ],
    equipment: &[
        ("Longsword", "Steel blade, well balanced"),
        ("Shortbow", "With a quiver of twenty arrows"),
        ("Leather Armor", "Worn but sturdy"),
        ("Wooden Shield", "Painted with a faded crest"),
        ("Healing Potion", "Restores minor wounds"),
        ("Rope", "Fifty feet of hemp"),
        ("Torch", "Burns for an hour"),
        ("Spellbook", "Dog-eared and annotated"),
        ("Thieves' Tools", "Picks and files in a roll"),
        ("Rations", "Five days of dried food"),
    ],
};

static CYBERPUNK_POOLS: ThemePools = ThemePools {
    names: &[
        "Nyx Voltaire",
        "Razor Kim",
        "Jax Mercer",
        "Echo Tanaka",
        "Vex Moreau",
        "Kaito Blackwire",
        "Siren Okafor",
        "Dex Castellano",
        "Neon Alvarez",
        "Ghost Ivanova",
    ],
    abilities: &[
        ("Combat Awareness", "Read a firefight before it starts"),
        ("Netrunning", "Jack in and crack local architecture"),
        ("Maker", "Jury-rig and repair any tech"),
        ("Credibility", "Sway public opinion through the feeds"),
        ("Operator", "Find anything for the right price"),
        ("Moto", "Coax more out of any vehicle"),
        ("Charismatic Impact", "Move a crowd with a performance"),
        ("Medicine", "Stabilize and patch up the wounded"),
    ],
    equipment: &[
        ("Heavy Pistol", "Reliable and loud"),
        ("Cyberdeck", "Personal NET running rig"),
        ("Neural Link", "Standard chrome interface"),
        ("Kevlar Jacket", "Light armor with style"),
        ("Agent", "Smart phone with a personality"),
        ("Monowire", "Nearly invisible cutting wire"),
        ("Med Kit", "Speedheal and bandages"),
        ("Burner Chips", "Untraceable eddies"),
        ("Mirrorshades", "Low-light optics built in"),
        ("Motorcycle", "Fast, loud and barely legal"),
    ],
};

static STALKER_POOLS: ThemePools = ThemePools {
    names: &[
        "Strelok",
        "Sidorovich",
        "Ghost",
        "Fang",
        "Bes",
        "Voronin",
        "Lukash",
        "Kruglov",
        "Degtyarev",
        "Sakharov",
    ],
    abilities: &[
        ("Anomaly Instinct", "Feel an anomaly before stepping in it"),
        ("Iron Lungs", "Shrug off low radiation"),
        ("Quick Hands", "Reload and swap weapons faster"),
        ("Zone Veteran", "Know the safe paths by heart"),
        ("Field Medic", "Patch wounds with whatever is at hand"),
        ("Haggler", "Traders give better prices"),
        ("Night Walker", "Move unseen after dark"),
        ("Steady Aim", "Hold a bead through the tremors"),
    ],
    equipment: &[
        ("AK-74", "Worn but dependable rifle"),
        ("Makarov PM", "Sidearm with two magazines"),
        ("Geiger Counter", "Clicks near radiation"),
        ("Anomaly Detector", "Beeps near anomalies"),
        ("Gas Mask", "Filters for toxic fog"),
        ("Bolts", "A pocketful for testing the ground"),
        ("Anti-Rad Drugs", "Flushes radiation"),
        ("Bandages", "Stops bleeding"),
        ("Canned Food", "Tourist's delight"),
        ("Vodka", "Cossacks brand"),
    ],
};

static SCIFI_POOLS: ThemePools = ThemePools {
    names: &[
        "Kira Vance",
        "Orion Hale",
        "Talia Reyes",
        "Zane Okonkwo",
        "Mira Solis",
        "Cassian Drell",
        "Juno Park",
        "Rhea Castor",
        "Idris Kade",
        "Sol Varga",
    ],
    abilities: &[
        ("Ace Pilot", "Pull maneuvers others would black out on"),
        ("Tech Savant", "Understand alien tech at a glance"),
        ("Xeno Empathy", "Read non-human body language"),
        ("Zero-G Adept", "Move freely without gravity"),
        ("Combat Reflexes", "React first when fire breaks out"),
        ("Negotiator", "Talk down hostile crews"),
        ("Field Surgeon", "Operate under fire"),
        ("Star Reader", "Plot jumps without a nav computer"),
    ],
    equipment: &[
        ("Plasma Pistol", "Compact energy sidearm"),
        ("Vacuum Suit", "Rated for six hours"),
        ("Datapad", "Loaded with star charts"),
        ("Multitool", "Cuts, welds and scans"),
        ("Medigel", "Seals wounds instantly"),
        ("Mag Boots", "Stick to any hull"),
        ("Translator", "Handles common alien dialects"),
        ("Ration Bars", "Tasteless but complete"),
        ("Grav Grenade", "Pulls targets together"),
        ("Holo Projector", "Displays maps and messages"),
    ],
};
