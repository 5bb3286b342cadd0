//! Organization domain module.

mod model;
mod repository;

pub use model::Org;
pub use repository::OrgRepository;
