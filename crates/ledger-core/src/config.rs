//! Configuration model for the ledger.
//!
//! Every section and key is optional in the file; missing values fall back to
//! the defaults below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LedgerConfig {
    pub cache: CacheSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
    pub service: ServiceSettings,
}

/// Session cache tuning.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CacheSettings {
    /// Soft upper bound on resident games.
    pub capacity: usize,
    /// Idle time after which a clean game may be evicted. `0` disables it.
    pub idle_ttl_secs: u64,
    /// Check organization membership on every access, not only on cold loads.
    pub revalidate_membership: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: 1024,
            idle_ttl_secs: 30 * 60,
            revalidate_membership: true,
        }
    }
}

impl CacheSettings {
    pub fn idle_ttl(&self) -> Option<Duration> {
        (self.idle_ttl_secs > 0).then(|| Duration::from_secs(self.idle_ttl_secs))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    /// Where game and directory files live. Platform data dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ServiceSettings {
    /// Commit after every successful mutation made through the use case.
    pub auto_commit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: LedgerConfig = toml::from_str("").unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.cache.capacity, 1024);
        assert!(config.cache.revalidate_membership);
        assert_eq!(config.cache.idle_ttl(), Some(Duration::from_secs(1800)));
    }

    #[test]
    fn test_partial_override() {
        let config: LedgerConfig = toml::from_str(
            r#"
            [cache]
            capacity = 8
            idle_ttl_secs = 0

            [logging]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.capacity, 8);
        assert_eq!(config.cache.idle_ttl(), None);
        assert!(config.cache.revalidate_membership);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
        assert!(!config.service.auto_commit);
    }
}
