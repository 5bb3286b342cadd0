use ledger_core::config::CacheSettings;
use ledger_core::error::{LedgerError, Result};
use ledger_core::game::Game;
use ledger_core::ids::GameId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OnceCell};

struct CacheEntry {
    game: Arc<Game>,
    last_access: Instant,
}

impl CacheEntry {
    fn new(game: Arc<Game>) -> Self {
        Self {
            game,
            last_access: Instant::now(),
        }
    }

    /// Nobody outside the cache holds the game, its lock is free and every
    /// mutation reached the store.
    fn is_evictable(&self) -> bool {
        Arc::strong_count(&self.game) == 1 && self.game.try_is_dirty() == Some(false)
    }

    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.last_access.elapsed() >= ttl)
    }
}

/// One in-flight cold load, shared by every caller asking for the same id.
type LoadSlot = Arc<OnceCell<Arc<Game>>>;

#[derive(Default)]
struct Entries {
    resident: HashMap<GameId, CacheEntry>,
    loading: HashMap<GameId, LoadSlot>,
}

/// How [`SessionCache::get_or_load`] produced a game.
pub enum Fetched {
    /// Already resident
    Cached(Arc<Game>),
    /// Loaded by this call's own loader
    Loaded(Arc<Game>),
    /// Loaded by a concurrent caller this call waited on
    Joined(Arc<Game>),
}

/// Bounded in-memory cache of live games.
///
/// The internal lock is held only for a single lookup, insert or sweep and
/// never while a game is being used. Entries with uncommitted changes are
/// never evicted, so the cache may grow past `capacity` under pressure.
///
/// Cold loads are single-flight: while a game is being read from storage
/// every other caller for that id waits on the same load, and the instance
/// it produces stays pinned until all of them have it.
pub struct SessionCache {
    entries: Mutex<Entries>,
    capacity: usize,
    idle_ttl: Option<Duration>,
}

impl SessionCache {
    /// Creates a new empty SessionCache.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Soft bound on resident games (at least 1)
    /// * `idle_ttl` - Idle time after which a clean game is dropped
    pub fn new(capacity: usize, idle_ttl: Option<Duration>) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            capacity: capacity.max(1),
            idle_ttl,
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.capacity, settings.idle_ttl())
    }

    /// Gets a cached game and refreshes its idle timer.
    pub async fn get(&self, id: GameId) -> Option<Arc<Game>> {
        let mut entries = self.entries.lock().await;
        entries.resident.get_mut(&id).map(|entry| {
            entry.last_access = Instant::now();
            entry.game.clone()
        })
    }

    /// Inserts a freshly created game. Fails if the id is already cached.
    pub async fn insert_new(&self, game: Arc<Game>) -> Result<Arc<Game>> {
        let mut entries = self.entries.lock().await;
        let id = game.id();
        if entries.resident.contains_key(&id) || entries.loading.contains_key(&id) {
            return Err(LedgerError::CacheCollision(id));
        }
        entries.resident.insert(id, CacheEntry::new(game.clone()));
        self.shrink(&mut entries.resident);
        Ok(game)
    }

    /// Returns the resident game, or runs `load` once for every concurrent
    /// caller of the same id and caches what it produces.
    ///
    /// A failed load caches nothing; callers still waiting on it retry with
    /// their own loader.
    pub async fn get_or_load<F, Fut>(&self, id: GameId, load: F) -> Result<Fetched>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<Game>>>,
    {
        let slot = {
            let mut entries = self.entries.lock().await;
            if let Some(entry) = entries.resident.get_mut(&id) {
                entry.last_access = Instant::now();
                return Ok(Fetched::Cached(entry.game.clone()));
            }
            entries
                .loading
                .entry(id)
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let mut ran_loader = false;
        let loaded = slot
            .get_or_try_init(|| {
                ran_loader = true;
                load()
            })
            .await
            .cloned();

        let mut entries = self.entries.lock().await;
        let registered = entries
            .loading
            .get(&id)
            .is_some_and(|current| Arc::ptr_eq(current, &slot));

        match loaded {
            Ok(game) => {
                if registered {
                    entries.loading.remove(&id);
                    entries.resident.insert(id, CacheEntry::new(game.clone()));
                    self.shrink(&mut entries.resident);
                    tracing::debug!(game_id = %id, "loaded game cached");
                }
                Ok(if ran_loader {
                    Fetched::Loaded(game)
                } else {
                    Fetched::Joined(game)
                })
            }
            Err(e) => {
                // Keep the slot while others still wait on it.
                if registered && Arc::strong_count(&slot) == 2 {
                    entries.loading.remove(&id);
                }
                Err(e)
            }
        }
    }

    /// Drops a single game.
    ///
    /// Returns `Ok(false)` if it was not cached or is in use right now, and
    /// `UncommittedChanges` if dropping it would lose mutations.
    pub async fn remove(&self, id: GameId) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.resident.get(&id) else {
            return Ok(false);
        };
        if Arc::strong_count(&entry.game) > 1 {
            return Ok(false);
        }
        match entry.game.try_is_dirty() {
            None => Ok(false),
            Some(true) => Err(LedgerError::UncommittedChanges(id)),
            Some(false) => {
                entries.resident.remove(&id);
                Ok(true)
            }
        }
    }

    /// Evicts every idle, evictable game. Returns how many were dropped.
    pub async fn evict_idle(&self) -> usize {
        let mut entries = self.entries.lock().await;
        self.evict_expired(&mut entries.resident)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.resident.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.resident.is_empty()
    }

    fn evict_expired(&self, resident: &mut HashMap<GameId, CacheEntry>) -> usize {
        let before = resident.len();
        resident.retain(|_, entry| !(entry.is_expired(self.idle_ttl) && entry.is_evictable()));
        let evicted = before - resident.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle games");
        }
        evicted
    }

    /// Drops expired games, then least recently used ones until the cache
    /// fits its capacity or nothing else can go.
    fn shrink(&self, resident: &mut HashMap<GameId, CacheEntry>) {
        self.evict_expired(resident);

        while resident.len() > self.capacity {
            let victim = resident
                .iter()
                .filter(|(_, entry)| entry.is_evictable())
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(id, _)| *id);

            match victim {
                Some(id) => {
                    resident.remove(&id);
                    tracing::debug!(game_id = %id, "evicted least recently used game");
                }
                None => {
                    tracing::warn!(
                        resident = resident.len(),
                        capacity = self.capacity,
                        "game cache over capacity, every resident game is busy or uncommitted"
                    );
                    break;
                }
            }
        }
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::from_settings(&CacheSettings::default())
    }
}
