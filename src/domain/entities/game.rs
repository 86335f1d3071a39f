//! Game entity - A tabletop campaign and its memberships

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{GameId, MemberRole, Mode, Theme, UserId};

/// A campaign owning characters and members
#[derive(Debug, Clone)]
pub struct Game {
    pub id: GameId,
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub theme: Theme,
    pub mode: Mode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    pub fn new(owner_id: UserId, name: impl Into<String>, theme: Theme, mode: Mode) -> Self {
        let now = Utc::now();
        Self {
            id: GameId::new(),
            owner_id,
            name: name.into(),
            description: String::new(),
            theme,
            mode,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A user's role within a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub game_id: GameId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(game_id: GameId, user_id: UserId, role: MemberRole) -> Self {
        Self {
            game_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    /// The owner membership created alongside a new game
    pub fn owner_of(game: &Game) -> Self {
        Self::new(game.id, game.owner_id, MemberRole::Owner)
    }
}
