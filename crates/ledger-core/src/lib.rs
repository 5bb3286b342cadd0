//! Domain core of the poker ledger.
//!
//! Holds the live game aggregate, the ledger entry types, the error taxonomy
//! and the ports (`GameRepository`, `OrgRepository`, `UserRepository`) that
//! infrastructure adapters implement.

pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod ids;
pub mod org;
pub mod user;

// Re-export common types
pub use error::{ErrorKind, LedgerError, Result};
pub use ids::{GameId, OrgId, UserId};
