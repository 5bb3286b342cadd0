//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs are the on-disk schema. They are private to the infrastructure
//! layer and convert to and from the domain types explicitly.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes. Documents with a different major
//!   version are refused.
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields).
//! - **PATCH (1.0.X)**: Backward-compatible fixes.
//!
//! ### Game Version History
//! - **1.0.0**: Initial schema (`start_stack`, `finish_stack`,
//!   `additional_incomes` per player)
//!
//! ### Directory Version History
//! - **1.0.0**: Initial schema (users and organizations)

mod directory;
mod game;

pub use directory::DirectoryV1_0_0;
pub use game::GameV1_0_0;

use ledger_core::error::{LedgerError, Result};
use semver::Version;

pub(crate) fn invalid_document(message: impl Into<String>) -> LedgerError {
    LedgerError::Serialization {
        format: "TOML".to_string(),
        message: message.into(),
    }
}

/// Accepts documents written with the same major schema version.
pub(crate) fn check_schema_version(document: &str, found: &str, supported: &str) -> Result<()> {
    let found_version = Version::parse(found).map_err(|e| {
        invalid_document(format!("{} schema version '{}' is invalid: {}", document, found, e))
    })?;
    let supported_version = Version::parse(supported)
        .map_err(|e| LedgerError::config(format!("bad built-in schema version: {}", e)))?;

    if found_version.major != supported_version.major {
        return Err(invalid_document(format!(
            "{} schema version {} is not supported (expected {}.x)",
            document, found_version, supported_version.major
        )));
    }
    Ok(())
}
