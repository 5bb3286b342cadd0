//! Configuration loading.
//!
//! Reads `LedgerConfig` from `config.toml` (by default
//! `~/.config/poker-ledger/config.toml`). A missing file or missing keys fall
//! back to defaults.

use crate::paths::LedgerPaths;
use crate::storage::AtomicTomlFile;
use ledger_core::config::LedgerConfig;
use ledger_core::error::{LedgerError, Result};
use std::path::{Path, PathBuf};

/// Loads the configuration from `path`, or from the platform config file.
pub fn load_config(path: Option<&Path>) -> Result<LedgerConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => LedgerPaths::default_config_file()?,
    };
    load_config_file(path)
}

fn load_config_file(path: PathBuf) -> Result<LedgerConfig> {
    let file = AtomicTomlFile::<LedgerConfig>::new(path);
    match file.load() {
        Ok(Some(config)) => {
            tracing::debug!(path = %file.path().display(), "configuration loaded");
            Ok(config)
        }
        Ok(None) => {
            tracing::debug!(path = %file.path().display(), "no configuration file, using defaults");
            Ok(LedgerConfig::default())
        }
        Err(e) => Err(LedgerError::config(e.to_string())),
    }
}

/// Writes `config` to `path`, replacing any existing file.
pub fn save_config(path: &Path, config: &LedgerConfig) -> Result<()> {
    AtomicTomlFile::new(path).save(config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let config = load_config(Some(temp_dir.path().join("config.toml").as_path())).unwrap();

        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_only_given_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[cache]\ncapacity = 8\n\n[storage]\ndata_dir = \"/srv/ledger\"\n\n[service]\nauto_commit = true\n",
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();

        assert_eq!(config.cache.capacity, 8);
        assert!(config.cache.revalidate_membership);
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/srv/ledger")));
        assert!(config.service.auto_commit);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[cache\ncapacity = ").unwrap();

        let err = load_config(Some(path.as_path())).unwrap_err();

        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut config = LedgerConfig::default();
        config.cache.idle_ttl_secs = 0;
        config.logging.json = true;

        save_config(&path, &config).unwrap();

        assert_eq!(load_config(Some(path.as_path())).unwrap(), config);
    }
}
