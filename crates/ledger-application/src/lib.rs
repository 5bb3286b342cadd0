//! Application layer for the poker ledger.
//!
//! This crate coordinates the domain aggregate with the repository ports:
//! [`SessionManager`] owns the live-game cache and access checks, and
//! [`GameUseCase`] exposes one call per ledger action. [`OrgUseCase`] guards
//! organization membership changes.

pub mod game_usecase;
pub mod org_usecase;
pub mod session;

pub use game_usecase::GameUseCase;
pub use org_usecase::OrgUseCase;
pub use session::{Fetched, SessionCache, SessionManager};
