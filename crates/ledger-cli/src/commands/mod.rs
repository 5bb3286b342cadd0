pub mod game;
pub mod org;
pub mod user;
