//! Error types for the poker ledger.

use crate::ids::{GameId, OrgId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a [`LedgerError`].
///
/// Request layers translate errors into responses by kind; only
/// `Infrastructure` is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    InvalidState,
    Inconsistent,
    Infrastructure,
}

/// A shared error type for the entire ledger workspace.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerError {
    /// No stored session with this id
    #[error("game not found: {0}")]
    SessionNotFound(GameId),

    /// Organization lookup failed (by name or id)
    #[error("organization not found: {0}")]
    OrgNotFound(String),

    /// A registered player's identity could not be resolved
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No player with this name in the session
    #[error("player not found: '{0}'")]
    PlayerNotFound(String),

    #[error("user {user_id} is not a member of organization {org_id}")]
    InsufficientPermissions { user_id: UserId, org_id: OrgId },

    #[error("user {user_id} is already a member of organization {org_id}")]
    AlreadyMember { user_id: UserId, org_id: OrgId },

    #[error("player name already taken: '{0}'")]
    NameTaken(String),

    /// Some players have no final stack yet
    #[error("game not finished, players without a final stack: {}", .pending.join(", "))]
    SessionNotFinished { pending: Vec<String> },

    #[error("invalid amount {amount}: {reason}")]
    InvalidAmount { amount: i64, reason: String },

    #[error("game {0} is already cached")]
    CacheCollision(GameId),

    #[error("game {0} has uncommitted changes")]
    UncommittedChanges(GameId),

    /// The ledger does not balance
    #[error("stacks are inconsistent: buy-ins {buy_ins} != buy-outs {buy_outs}")]
    StackInconsistent { buy_ins: i128, buy_outs: i128 },

    /// Port or storage failure, wrapped with the operation that failed
    #[error("cannot {operation}: {message}")]
    Infrastructure { operation: String, message: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Wraps a lower-level failure with the operation it interrupted.
    pub fn infrastructure(operation: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Infrastructure {
            operation: operation.into(),
            message: err.to_string(),
        }
    }

    pub fn invalid_amount(amount: i64, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            amount,
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Re-labels an infrastructure failure with the outer operation.
    ///
    /// Domain errors pass through untouched so callers can still match on them.
    pub fn context(self, operation: impl Into<String>) -> Self {
        match self.kind() {
            ErrorKind::Infrastructure => Self::Infrastructure {
                operation: operation.into(),
                message: self.to_string(),
            },
            _ => self,
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SessionNotFound(_)
            | Self::OrgNotFound(_)
            | Self::UserNotFound(_)
            | Self::PlayerNotFound(_) => ErrorKind::NotFound,
            Self::InsufficientPermissions { .. } => ErrorKind::PermissionDenied,
            Self::NameTaken(_)
            | Self::AlreadyMember { .. }
            | Self::SessionNotFinished { .. }
            | Self::InvalidAmount { .. }
            | Self::CacheCollision(_)
            | Self::UncommittedChanges(_) => ErrorKind::InvalidState,
            Self::StackInconsistent { .. } => ErrorKind::Inconsistent,
            Self::Infrastructure { .. }
            | Self::Io { .. }
            | Self::Serialization { .. }
            | Self::Config(_) => ErrorKind::Infrastructure,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_permission_denied(&self) -> bool {
        self.kind() == ErrorKind::PermissionDenied
    }

    pub fn is_infrastructure(&self) -> bool {
        self.kind() == ErrorKind::Infrastructure
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for LedgerError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, LedgerError>`.
pub type Result<T> = std::result::Result<T, LedgerError>;
