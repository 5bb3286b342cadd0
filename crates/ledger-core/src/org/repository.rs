//! Organization repository trait.

use super::model::Org;
use crate::error::Result;
use crate::ids::{OrgId, UserId};
use async_trait::async_trait;

/// Membership resolution for games.
///
/// Lookups return `Ok(None)` when the organization does not exist; `Err` is
/// reserved for storage failures.
#[async_trait]
pub trait OrgRepository: Send + Sync {
    async fn find_by_id(&self, id: OrgId) -> Result<Option<Org>>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Org>>;

    /// Creates an organization with `admin` as its first member.
    async fn create(&self, admin: UserId, name: &str) -> Result<Org>;

    /// Adds a member.
    ///
    /// Fails with `OrgNotFound` for an unknown organization and with
    /// `AlreadyMember` if `user_id` already belongs to it (the admin does).
    async fn add_member(&self, org_id: OrgId, user_id: UserId) -> Result<()>;

    /// Every organization `user_id` belongs to, ordered by name.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Org>>;
}
