//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: User, Game, Membership, Invitation, Character
//! - Value Objects: ids, themes, roles, typed sheet fields, dice notation
//! - Aggregates: the combat tracker
//! - Domain Services: field templates and character generation

pub mod aggregates;
pub mod entities;
pub mod services;
pub mod value_objects;
