//! User domain module.
//!
//! - `model`: registered user
//! - `repository`: identity lookup port

mod model;
mod repository;

pub use model::User;
pub use repository::UserRepository;
