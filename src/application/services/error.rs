//! Errors returned by application services

use crate::domain::aggregates::CombatError;
use crate::domain::value_objects::MemberRole;

/// Failure of a use case
///
/// Everything except `Internal` is an expected outcome that callers turn into
/// a user-facing message. `Internal` wraps collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Requires {0} access")]
    Forbidden(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub(crate) fn forbidden_for(required: MemberRole) -> Self {
        match required {
            MemberRole::Owner => Self::Forbidden("owner"),
            MemberRole::Editor => Self::Forbidden("editor"),
            MemberRole::Viewer => Self::Forbidden("member"),
        }
    }
}
