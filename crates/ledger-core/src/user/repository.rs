//! User repository trait.

use super::model::User;
use crate::error::Result;
use crate::ids::UserId;
use async_trait::async_trait;

/// Identity resolution for registered players.
///
/// - `Ok(Some(User))`: user exists
/// - `Ok(None)`: no such user
/// - `Err(_)`: the backing store failed
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Registers a new user and returns it with a fresh id.
    async fn create(&self, username: &str, email: &str) -> Result<User>;
}
