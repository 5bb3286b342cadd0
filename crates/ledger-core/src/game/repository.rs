//! Game repository trait.
//!
//! Defines the interface for durable game storage.

use super::data::GameData;
use crate::error::Result;
use crate::ids::{GameId, OrgId, UserId};
use async_trait::async_trait;

/// An abstract store for game documents.
///
/// Decouples the ledger from the storage mechanism (TOML files, a document
/// database, memory). Implementations must make `replace` a whole-document
/// write: either the new document is visible in full or the old one remains.
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Creates and stores an empty game.
    ///
    /// The repository assigns the id and the start time.
    async fn create(&self, organizer: UserId, organization: OrgId) -> Result<GameData>;

    /// Replaces the stored document for `game.id`.
    ///
    /// Fails with `SessionNotFound` if the game was never created.
    async fn replace(&self, game: &GameData) -> Result<()>;

    /// Finds a game by its ID.
    ///
    /// - `Ok(Some(GameData))`: game found
    /// - `Ok(None)`: game not found
    /// - `Err(_)`: error occurred during retrieval
    async fn find_by_id(&self, id: GameId) -> Result<Option<GameData>>;
}
