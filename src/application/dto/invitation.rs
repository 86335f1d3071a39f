use serde::{Deserialize, Serialize};

use crate::application::services::PendingInvitation;
use crate::domain::entities::Invitation;
use crate::domain::value_objects::MemberRole;

fn default_role() -> String {
    MemberRole::Viewer.as_str().to_string()
}

#[derive(Debug, Deserialize)]
pub struct InviteRequestDto {
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct InvitationResponseDto {
    pub token: String,
    pub game_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_name: Option<String>,
    pub inviter_id: String,
    pub invitee_email: String,
    pub role: MemberRole,
    pub created_at: String,
    pub expires_at: String,
}

impl From<Invitation> for InvitationResponseDto {
    fn from(i: Invitation) -> Self {
        Self {
            token: i.token,
            game_id: i.game_id.to_string(),
            game_name: None,
            inviter_id: i.inviter_id.to_string(),
            invitee_email: i.invitee_email,
            role: i.role,
            created_at: i.created_at.to_rfc3339(),
            expires_at: i.expires_at.to_rfc3339(),
        }
    }
}

impl From<PendingInvitation> for InvitationResponseDto {
    fn from(p: PendingInvitation) -> Self {
        Self {
            game_name: Some(p.game_name),
            ..Self::from(p.invitation)
        }
    }
}
