//! Value objects - Immutable objects defined by their attributes

mod dice;
mod field;
mod ids;
mod role;
mod theme;

pub use dice::{DiceError, DiceNotation, DiceRoll};
pub use field::{CharacterField, FieldCategory, FieldValue};
pub use ids::*;
pub use role::MemberRole;
pub use theme::{Mode, Theme};
