use serde::{Deserialize, Serialize};

use crate::application::services::{
    CreateGameRequest, GameWithRole, MemberDetails, UpdateGameRequest,
};
use crate::domain::entities::Membership;
use crate::domain::value_objects::{MemberRole, Mode, Theme};

#[derive(Debug, Deserialize)]
pub struct CreateGameRequestDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Theme id; unknown values fall back to fantasy
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub mode: String,
}

impl From<CreateGameRequestDto> for CreateGameRequest {
    fn from(dto: CreateGameRequestDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            theme: Theme::parse_lossy(&dto.theme),
            mode: Mode::parse_lossy(&dto.mode),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateGameRequestDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub mode: Option<String>,
}

impl From<UpdateGameRequestDto> for UpdateGameRequest {
    fn from(dto: UpdateGameRequestDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            theme: dto.theme.as_deref().map(Theme::parse_lossy),
            mode: dto.mode.as_deref().map(Mode::parse_lossy),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GameResponseDto {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub theme: Theme,
    pub mode: Mode,
    /// The caller's role
    pub role: MemberRole,
    pub created_at: String,
    pub updated_at: String,
}

impl From<GameWithRole> for GameResponseDto {
    fn from(g: GameWithRole) -> Self {
        let game = g.game;
        Self {
            id: game.id.to_string(),
            owner_id: game.owner_id.to_string(),
            name: game.name,
            description: game.description,
            theme: game.theme,
            mode: game.mode,
            role: g.role,
            created_at: game.created_at.to_rfc3339(),
            updated_at: game.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequestDto {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct MemberResponseDto {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub role: MemberRole,
    pub joined_at: String,
}

impl From<MemberDetails> for MemberResponseDto {
    fn from(m: MemberDetails) -> Self {
        Self {
            user_id: m.membership.user_id.to_string(),
            username: m.username,
            email: m.email,
            role: m.membership.role,
            joined_at: m.membership.joined_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MembershipResponseDto {
    pub game_id: String,
    pub user_id: String,
    pub role: MemberRole,
    pub joined_at: String,
}

impl From<Membership> for MembershipResponseDto {
    fn from(m: Membership) -> Self {
        Self {
            game_id: m.game_id.to_string(),
            user_id: m.user_id.to_string(),
            role: m.role,
            joined_at: m.joined_at.to_rfc3339(),
        }
    }
}
