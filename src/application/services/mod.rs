//! Application services - Use case implementations
//!
//! This module contains the application services that implement the use cases
//! for the Partybook engine. Each service follows hexagonal architecture
//! principles, accepting port dependencies and returning domain entities.

mod access;
pub mod account_service;
pub mod character_service;
pub mod combat_service;
pub mod error;
pub mod game_removal;
pub mod game_service;
pub mod invitation_service;
pub mod password;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ServiceError, ServiceResult};

// Re-export account service types
pub use account_service::{
    AccountService, AccountServiceImpl, ChangePasswordRequest, RegisterRequest,
};

// Re-export game service types
pub use game_removal::GameRemoval;
pub use game_service::{
    CreateGameRequest, GameService, GameServiceImpl, GameWithRole, MemberDetails,
    UpdateGameRequest,
};

// Re-export invitation service types
pub use invitation_service::{
    InvitationService, InvitationServiceImpl, InviteRequest, PendingInvitation,
};

// Re-export character service types
pub use character_service::{
    CharacterService, CharacterServiceImpl, CreateCharacterRequest, PhotoUpload,
    UpdateCharacterRequest, MAX_PHOTO_BYTES,
};

// Re-export combat service types
pub use combat_service::{CombatService, CombatServiceImpl, HealthChange};
