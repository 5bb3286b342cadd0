use super::cache::{Fetched, SessionCache};
use ledger_core::config::CacheSettings;
use ledger_core::error::{LedgerError, Result};
use ledger_core::game::{Game, GameRepository};
use ledger_core::ids::{GameId, OrgId, UserId};
use ledger_core::org::OrgRepository;
use ledger_core::user::UserRepository;
use std::sync::Arc;

/// Manages live games and their lifecycle.
///
/// `SessionManager` is responsible for:
/// - Creating new games inside an organization
/// - Serving games from the cache or loading them from storage
/// - Checking that callers belong to the game's organization
/// - Committing in-memory ledgers back to storage
///
/// One instance is shared by every request for the lifetime of the process.
pub struct SessionManager {
    /// In-memory game cache
    cache: SessionCache,
    /// Persistent storage backend for game documents
    game_repository: Arc<dyn GameRepository>,
    /// Organization lookup for ownership and membership
    org_repository: Arc<dyn OrgRepository>,
    /// Identity lookup handed to every game for registered players
    user_repository: Arc<dyn UserRepository>,
    /// Check membership on cache hits too, not only on cold loads
    revalidate_membership: bool,
}

impl SessionManager {
    /// Creates a new `SessionManager` with repository backends.
    ///
    /// # Arguments
    ///
    /// * `game_repository` - Durable game storage
    /// * `org_repository` - Organization lookup
    /// * `user_repository` - User lookup for registered players
    /// * `settings` - Cache bounds and the membership re-validation switch
    pub fn new(
        game_repository: Arc<dyn GameRepository>,
        org_repository: Arc<dyn OrgRepository>,
        user_repository: Arc<dyn UserRepository>,
        settings: &CacheSettings,
    ) -> Self {
        Self {
            cache: SessionCache::from_settings(settings),
            game_repository,
            org_repository,
            user_repository,
            revalidate_membership: settings.revalidate_membership,
        }
    }

    /// Creates an empty game owned by `org_name` and caches it.
    ///
    /// # Errors
    ///
    /// - `OrgNotFound` if no organization has that name
    /// - `InsufficientPermissions` if membership is enforced and `requester`
    ///   is not a member
    /// - `CacheCollision` if the new id is somehow already cached
    /// - `Infrastructure` if a repository fails
    pub async fn create_game(&self, requester: UserId, org_name: &str) -> Result<Arc<Game>> {
        let org = self
            .org_repository
            .find_by_name(org_name)
            .await
            .map_err(|e| e.context("find organization"))?
            .ok_or_else(|| LedgerError::OrgNotFound(org_name.to_string()))?;

        if self.revalidate_membership && !org.is_member(requester) {
            tracing::warn!(user_id = %requester, org = org_name, "game creation denied");
            return Err(LedgerError::InsufficientPermissions {
                user_id: requester,
                org_id: org.id,
            });
        }

        let data = self
            .game_repository
            .create(requester, org.id)
            .await
            .map_err(|e| e.context("create game"))?;

        let game = Arc::new(Game::from_data(data, self.user_repository.clone()));
        let game = self.cache.insert_new(game).await?;

        tracing::info!(game_id = %game.id(), org = org_name, organizer = %requester, "game created");
        Ok(game)
    }

    /// Returns a live game the caller may use.
    ///
    /// A cached game is returned directly, after re-checking membership when
    /// that is enabled. Otherwise the game is loaded from storage, membership
    /// is checked and the game is cached. Concurrent cold loads of one game
    /// share a single read, so every caller gets the same instance.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if storage has no such game
    /// - `OrgNotFound` if the owning organization is gone
    /// - `InsufficientPermissions` if `caller` is not a member
    /// - `Infrastructure` if a repository fails
    pub async fn get_game(&self, caller: UserId, game_id: GameId) -> Result<Arc<Game>> {
        let fetched = self
            .cache
            .get_or_load(game_id, || self.load(caller, game_id))
            .await?;

        match fetched {
            Fetched::Cached(game) => {
                if self.revalidate_membership {
                    self.authorize(caller, game.organization()).await?;
                }
                tracing::debug!(game_id = %game_id, "game served from cache");
                Ok(game)
            }
            Fetched::Loaded(game) => {
                tracing::debug!(game_id = %game_id, "game loaded from storage");
                Ok(game)
            }
            Fetched::Joined(game) => {
                // Loaded on behalf of another caller.
                self.authorize(caller, game.organization()).await?;
                Ok(game)
            }
        }
    }

    /// Replaces the stored game with its current in-memory ledger.
    ///
    /// A failed write is not compensated: the cached game keeps its changes
    /// (and stays pinned in the cache) until a later commit succeeds.
    pub async fn commit(&self, caller: UserId, game_id: GameId) -> Result<()> {
        let game = self.get_game(caller, game_id).await?;

        match game.persist(self.game_repository.as_ref()).await {
            Ok(revision) => {
                tracing::info!(game_id = %game_id, revision, "game committed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(game_id = %game_id, error = %e, "game commit failed");
                Err(e.context("replace game"))
            }
        }
    }

    /// Drops idle games that have nothing left to commit.
    pub async fn evict_idle(&self) -> usize {
        self.cache.evict_idle().await
    }

    /// Drops one cached game so the next access reloads it from storage.
    ///
    /// Returns `Ok(false)` when the game is not cached or currently in use.
    pub async fn invalidate(&self, game_id: GameId) -> Result<bool> {
        self.cache.remove(game_id).await
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.len().await
    }

    /// Reads a game from storage and checks `caller` against its owner.
    async fn load(&self, caller: UserId, game_id: GameId) -> Result<Arc<Game>> {
        let data = self
            .game_repository
            .find_by_id(game_id)
            .await
            .map_err(|e| e.context("load game"))?
            .ok_or(LedgerError::SessionNotFound(game_id))?;

        self.authorize(caller, data.organization).await?;

        Ok(Arc::new(Game::from_data(data, self.user_repository.clone())))
    }

    async fn authorize(&self, caller: UserId, org_id: OrgId) -> Result<()> {
        let org = self
            .org_repository
            .find_by_id(org_id)
            .await
            .map_err(|e| e.context("load organization"))?
            .ok_or_else(|| LedgerError::OrgNotFound(org_id.to_string()))?;

        if !org.is_member(caller) {
            tracing::warn!(user_id = %caller, org_id = %org_id, "access to game denied");
            return Err(LedgerError::InsufficientPermissions {
                user_id: caller,
                org_id,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
