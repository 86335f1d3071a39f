//! Outbound ports - Interfaces that the application requires from external systems

mod repository_port;
mod storage_port;
mod verification_port;

pub use repository_port::{
    CharacterRepositoryPort, GameRepositoryPort, InvitationRepositoryPort,
    MembershipRepositoryPort, UserRepositoryPort,
};
pub use storage_port::PhotoStoragePort;
pub use verification_port::{VerificationChannelPort, VERIFICATION_CODE_LENGTH};
