//! Persistent game document.

use super::player::Player;
use crate::ids::{GameId, OrgId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything stored for one session.
///
/// `id`, `organizer`, `organization` and `started_at` never change after
/// creation; `players` is replaced wholesale on every commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub id: GameId,
    pub organizer: UserId,
    pub organization: OrgId,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl GameData {
    /// A fresh game with no players.
    pub fn new(organizer: UserId, organization: OrgId, started_at: DateTime<Utc>) -> Self {
        Self {
            id: GameId::new(),
            organizer,
            organization,
            started_at,
            players: Vec::new(),
        }
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == name)
    }
}
