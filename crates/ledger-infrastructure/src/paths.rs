//! Path management for ledger configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/poker-ledger/          # Config directory
//! └── config.toml                  # LedgerConfig
//!
//! ~/.local/share/poker-ledger/     # Data directory (overridable)
//! ├── directory.toml               # Organizations and users
//! └── games/
//!     └── <game-id>.toml           # One document per game
//! ```

use ledger_core::error::LedgerError;
use ledger_core::ids::GameId;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "poker-ledger";

/// Errors that can occur during path resolution.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("cannot determine the platform {0} directory")]
    DirNotFound(&'static str),
}

impl From<PathError> for LedgerError {
    fn from(err: PathError) -> Self {
        LedgerError::config(err.to_string())
    }
}

/// Resolved locations of every ledger file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPaths {
    data_dir: PathBuf,
}

impl LedgerPaths {
    /// Uses `data_dir` when given, else the platform data directory.
    pub fn resolve(data_dir: Option<&Path>) -> Result<Self, PathError> {
        match data_dir {
            Some(dir) => Ok(Self::new(dir)),
            None => Ok(Self::new(Self::default_data_dir()?)),
        }
    }

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Platform data directory, e.g. `~/.local/share/poker-ledger`.
    pub fn default_data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("data"))
    }

    /// Platform config file, e.g. `~/.config/poker-ledger/config.toml`.
    pub fn default_config_file() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join("config.toml"))
            .ok_or(PathError::DirNotFound("config"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn games_dir(&self) -> PathBuf {
        self.data_dir.join("games")
    }

    pub fn game_file(&self, id: GameId) -> PathBuf {
        self.games_dir().join(format!("{}.toml", id))
    }

    pub fn directory_file(&self) -> PathBuf {
        self.data_dir.join("directory.toml")
    }
}
