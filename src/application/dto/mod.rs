//! Data Transfer Objects - For API boundaries
//!
//! Request DTOs accept loosely typed input and convert it into service
//! requests; response DTOs flatten entities into their wire shape.

pub mod account;
pub mod character;
pub mod combat;
pub mod game;
pub mod invitation;
pub mod template;

pub use account::*;
pub use character::*;
pub use combat::*;
pub use game::*;
pub use invitation::*;
pub use template::*;
