//! Organization domain model.

use crate::ids::{OrgId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A club that owns games. Only its members may touch those games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Org {
    pub id: OrgId,
    /// Unique organization name
    pub name: String,
    pub admin: UserId,
    #[serde(default)]
    pub members: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Org {
    /// The admin is always a member, listed or not.
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.admin == user_id || self.members.contains(&user_id)
    }
}
