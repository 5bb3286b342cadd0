//! Game domain module.
//!
//! - `player`: ledger entries (`Player`, `Transaction`, `PlayerIdentity`)
//! - `data`: the persisted game document
//! - `aggregate`: the live, lock-guarded `Game`
//! - `report`: settlement math shared by verify and report
//! - `repository`: storage port for game documents

mod aggregate;
mod data;
mod player;
mod report;
mod repository;

pub use aggregate::Game;
pub use data::GameData;
pub use player::{Player, PlayerIdentity, PlayerRef, Transaction, TransactionReason};
pub use report::{PlayerResult, Report, Totals};
pub use repository::GameRepository;
