//! Domain entities - Core business objects with identity

mod character;
mod game;
mod invitation;
mod user;

pub use character::Character;
pub use game::{Game, Membership};
pub use invitation::Invitation;
pub use user::{looks_like_email, normalize_email, User};
