//! Directory document DTOs: organizations and users in one file.

use super::check_schema_version;
use ledger_core::error::Result;
use ledger_core::org::Org;
use ledger_core::user::User;
use serde::{Deserialize, Serialize};

pub const DIRECTORY_SCHEMA_VERSION: &str = "1.0.0";

/// V1.0.0: every organization and user known to this installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryV1_0_0 {
    pub schema_version: String,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub orgs: Vec<Org>,
}

impl DirectoryV1_0_0 {
    pub fn check(&self) -> Result<()> {
        check_schema_version("directory", &self.schema_version, DIRECTORY_SCHEMA_VERSION)
    }
}

impl Default for DirectoryV1_0_0 {
    fn default() -> Self {
        Self {
            schema_version: DIRECTORY_SCHEMA_VERSION.to_string(),
            users: Vec::new(),
            orgs: Vec::new(),
        }
    }
}
