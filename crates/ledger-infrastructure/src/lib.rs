//! Port adapters for the poker ledger.
//!
//! - [`memory`]: in-memory repositories for tests and embedding
//! - [`TomlGameRepository`] and [`TomlDirectory`]: file-backed repositories
//!   under a data directory laid out by [`paths::LedgerPaths`]
//! - [`config_service`]: `LedgerConfig` loading

pub mod config_service;
mod dto;
pub mod memory;
pub mod paths;
pub mod storage;
pub mod toml_directory;
pub mod toml_game_repository;

pub use crate::memory::{InMemoryGameRepository, InMemoryOrgRepository, InMemoryUserRepository};
pub use crate::paths::LedgerPaths;
pub use crate::toml_directory::TomlDirectory;
pub use crate::toml_game_repository::TomlGameRepository;
