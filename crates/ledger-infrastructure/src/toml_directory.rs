//! TOML-backed organization and user directory.

use crate::dto::DirectoryV1_0_0;
use crate::paths::LedgerPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use ledger_core::clock::{Clock, SystemClock};
use ledger_core::error::{LedgerError, Result};
use ledger_core::ids::{OrgId, UserId};
use ledger_core::org::{Org, OrgRepository};
use ledger_core::user::{User, UserRepository};
use std::sync::Arc;

/// Organizations and users stored together in `directory.toml`.
///
/// Reads load the whole document; writes are locked read-modify-write
/// cycles, so several processes can share one data directory.
pub struct TomlDirectory {
    file: AtomicTomlFile<DirectoryV1_0_0>,
    clock: Arc<dyn Clock>,
}

impl TomlDirectory {
    pub fn new(paths: &LedgerPaths) -> Self {
        Self::with_clock(paths, Arc::new(SystemClock))
    }

    pub fn with_clock(paths: &LedgerPaths, clock: Arc<dyn Clock>) -> Self {
        Self {
            file: AtomicTomlFile::new(paths.directory_file()),
            clock,
        }
    }

    fn load(&self) -> Result<DirectoryV1_0_0> {
        let directory = self.file.load()?.unwrap_or_default();
        directory.check()?;
        Ok(directory)
    }

    fn update<R>(&self, f: impl FnOnce(&mut DirectoryV1_0_0) -> Result<R>) -> Result<R> {
        self.file.update(DirectoryV1_0_0::default(), |directory| {
            directory.check()?;
            f(directory)
        })
    }

    /// Looks a user up by username.
    pub fn find_user_by_name(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .load()?
            .users
            .into_iter()
            .find(|user| user.username == username))
    }
}

#[async_trait]
impl OrgRepository for TomlDirectory {
    async fn find_by_id(&self, id: OrgId) -> Result<Option<Org>> {
        Ok(self.load()?.orgs.into_iter().find(|org| org.id == id))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Org>> {
        Ok(self.load()?.orgs.into_iter().find(|org| org.name == name))
    }

    async fn create(&self, admin: UserId, name: &str) -> Result<Org> {
        let org = Org {
            id: OrgId::new(),
            name: name.to_string(),
            admin,
            members: vec![admin],
            created_at: self.clock.now(),
        };

        self.update(|directory| {
            if directory.orgs.iter().any(|existing| existing.name == name) {
                return Err(LedgerError::infrastructure(
                    "create organization",
                    format!("name '{}' already exists", name),
                ));
            }
            directory.orgs.push(org.clone());
            Ok(())
        })?;

        tracing::info!(org_id = %org.id, name, admin = %admin, "organization created");
        Ok(org)
    }

    async fn add_member(&self, org_id: OrgId, user_id: UserId) -> Result<()> {
        self.update(|directory| {
            let org = directory
                .orgs
                .iter_mut()
                .find(|org| org.id == org_id)
                .ok_or_else(|| LedgerError::OrgNotFound(org_id.to_string()))?;
            if org.is_member(user_id) {
                return Err(LedgerError::AlreadyMember { user_id, org_id });
            }
            org.members.push(user_id);
            Ok(())
        })?;

        tracing::info!(org_id = %org_id, user_id = %user_id, "member added");
        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Org>> {
        let mut orgs: Vec<Org> = self
            .load()?
            .orgs
            .into_iter()
            .filter(|org| org.is_member(user_id))
            .collect();
        orgs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(orgs)
    }
}

#[async_trait]
impl UserRepository for TomlDirectory {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.load()?.users.into_iter().find(|user| user.id == id))
    }

    async fn create(&self, username: &str, email: &str) -> Result<User> {
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            email: email.to_string(),
            created_at: self.clock.now(),
        };

        self.update(|directory| {
            if directory.users.iter().any(|existing| existing.username == username) {
                return Err(LedgerError::infrastructure(
                    "create user",
                    format!("username '{}' already exists", username),
                ));
            }
            directory.users.push(user.clone());
            Ok(())
        })?;

        tracing::info!(user_id = %user.id, username, "user created");
        Ok(user)
    }
}
