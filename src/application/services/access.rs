//! Membership checks shared by the game-scoped services

use anyhow::Context;

use super::error::{ServiceError, ServiceResult};
use crate::application::ports::outbound::MembershipRepositoryPort;
use crate::domain::entities::Membership;
use crate::domain::value_objects::{GameId, MemberRole, UserId};

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

/// Load the caller's membership and check it grants at least `required`.
///
/// Non-members get `NotFound` so a game's existence is not revealed.
pub(crate) async fn require_role(
    memberships: &dyn MembershipRepositoryPort,
    game_id: GameId,
    user_id: UserId,
    required: MemberRole,
) -> ServiceResult<Membership> {
    let membership = memberships
        .get(game_id, user_id)
        .await
        .context("Failed to load membership")?
        .ok_or(ServiceError::NotFound("Game"))?;

    let allowed = match required {
        MemberRole::Owner => membership.role.can_manage(),
        MemberRole::Editor => membership.role.can_edit(),
        MemberRole::Viewer => true,
    };
    if !allowed {
        return Err(ServiceError::forbidden_for(required));
    }
    Ok(membership)
}

/// Trimmed, non-empty and bounded
pub(crate) fn validate_name(what: &str, name: &str) -> ServiceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::validation(format!("{} cannot be empty", what)));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ServiceError::validation(format!(
            "{} cannot exceed {} characters",
            what, MAX_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

pub(crate) fn validate_description(description: &str) -> ServiceResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ServiceError::validation(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}
