//! Session application services.
//!
//! This module contains the live-game cache and the manager that creates,
//! loads, authorizes and commits games.

mod cache;
mod manager;

pub use cache::{Fetched, SessionCache};
pub use manager::SessionManager;
