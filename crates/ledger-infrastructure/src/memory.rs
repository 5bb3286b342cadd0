//! In-memory implementations of the ledger ports.
//!
//! Used by tests and by embedders that bring their own persistence. Records
//! are cloned in and out, so callers never share state with the store.

use async_trait::async_trait;
use ledger_core::clock::{Clock, SystemClock};
use ledger_core::error::{LedgerError, Result};
use ledger_core::game::{GameData, GameRepository};
use ledger_core::ids::{GameId, OrgId, UserId};
use ledger_core::org::{Org, OrgRepository};
use ledger_core::user::{User, UserRepository};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

fn read<'a, T>(lock: &'a RwLock<T>, what: &str) -> Result<RwLockReadGuard<'a, T>> {
    lock.read()
        .map_err(|_| LedgerError::infrastructure(format!("read {}", what), "lock poisoned"))
}

fn write<'a, T>(lock: &'a RwLock<T>, what: &str) -> Result<RwLockWriteGuard<'a, T>> {
    lock.write()
        .map_err(|_| LedgerError::infrastructure(format!("write {}", what), "lock poisoned"))
}

/// Game documents kept in a map.
pub struct InMemoryGameRepository {
    games: RwLock<HashMap<GameId, GameData>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored games.
    pub fn len(&self) -> usize {
        self.games.read().map(|games| games.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryGameRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn create(&self, organizer: UserId, organization: OrgId) -> Result<GameData> {
        let data = GameData::new(organizer, organization, self.clock.now());
        write(&self.games, "games")?.insert(data.id, data.clone());
        Ok(data)
    }

    async fn replace(&self, game: &GameData) -> Result<()> {
        let mut games = write(&self.games, "games")?;
        match games.get_mut(&game.id) {
            Some(stored) => {
                *stored = game.clone();
                Ok(())
            }
            None => Err(LedgerError::SessionNotFound(game.id)),
        }
    }

    async fn find_by_id(&self, id: GameId) -> Result<Option<GameData>> {
        Ok(read(&self.games, "games")?.get(&id).cloned())
    }
}

/// Organizations kept in a map. Names are unique.
pub struct InMemoryOrgRepository {
    orgs: RwLock<HashMap<OrgId, Org>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryOrgRepository {
    pub fn new() -> Self {
        Self {
            orgs: RwLock::new(HashMap::new()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Removes a member again. Returns whether they were listed.
    pub fn remove_member(&self, org_id: OrgId, user_id: UserId) -> Result<bool> {
        let mut orgs = write(&self.orgs, "organizations")?;
        let org = orgs
            .get_mut(&org_id)
            .ok_or_else(|| LedgerError::OrgNotFound(org_id.to_string()))?;
        let before = org.members.len();
        org.members.retain(|m| *m != user_id);
        Ok(org.members.len() != before)
    }
}

impl Default for InMemoryOrgRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrgRepository for InMemoryOrgRepository {
    async fn find_by_id(&self, id: OrgId) -> Result<Option<Org>> {
        Ok(read(&self.orgs, "organizations")?.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Org>> {
        Ok(read(&self.orgs, "organizations")?
            .values()
            .find(|org| org.name == name)
            .cloned())
    }

    async fn create(&self, admin: UserId, name: &str) -> Result<Org> {
        let mut orgs = write(&self.orgs, "organizations")?;
        if orgs.values().any(|org| org.name == name) {
            return Err(LedgerError::infrastructure(
                "create organization",
                format!("name '{}' already exists", name),
            ));
        }
        let org = Org {
            id: OrgId::new(),
            name: name.to_string(),
            admin,
            members: vec![admin],
            created_at: self.clock.now(),
        };
        orgs.insert(org.id, org.clone());
        Ok(org)
    }

    async fn add_member(&self, org_id: OrgId, user_id: UserId) -> Result<()> {
        let mut orgs = write(&self.orgs, "organizations")?;
        let org = orgs
            .get_mut(&org_id)
            .ok_or_else(|| LedgerError::OrgNotFound(org_id.to_string()))?;
        if org.is_member(user_id) {
            return Err(LedgerError::AlreadyMember { user_id, org_id });
        }
        org.members.push(user_id);
        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Org>> {
        let mut orgs: Vec<Org> = read(&self.orgs, "organizations")?
            .values()
            .filter(|org| org.is_member(user_id))
            .cloned()
            .collect();
        orgs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(orgs)
    }
}

/// Users kept in a map.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            clock: Arc::new(SystemClock),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(read(&self.users, "users")?.get(&id).cloned())
    }

    async fn create(&self, username: &str, email: &str) -> Result<User> {
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            email: email.to_string(),
            created_at: self.clock.now(),
        };
        write(&self.users, "users")?.insert(user.id, user.clone());
        Ok(user)
    }
}
