//! Domain services - Pure business logic with no I/O

mod character_generator;
mod field_templates;

pub use character_generator::{
    blank_character, generate_character, generate_random_character, theme_pools,
    GeneratedCharacter, ThemePools, NARRATIVE_FIELDS,
};
pub use field_templates::{field_template, get_field_template, FieldDescriptor};
