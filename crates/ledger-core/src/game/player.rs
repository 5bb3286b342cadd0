//! Ledger entries: players and the transactions between them.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who sits behind a seat.
///
/// Anonymous guests only have a display name; registered players also carry
/// the user id they were resolved to when they joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerIdentity {
    Anonymous { name: String },
    Registered { user_id: UserId, name: String },
}

impl PlayerIdentity {
    pub fn name(&self) -> &str {
        match self {
            Self::Anonymous { name } | Self::Registered { name, .. } => name,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous { .. } => None,
            Self::Registered { user_id, .. } => Some(*user_id),
        }
    }
}

/// Why money moved between two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionReason {
    /// The payer re-bought with chips handed over by the receiver.
    #[serde(rename = "peer re-buy")]
    PeerReBuy,
}

impl fmt::Display for TransactionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeerReBuy => f.write_str("peer re-buy"),
        }
    }
}

/// Reference to the paying side of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub name: String,
}

impl From<&PlayerIdentity> for PlayerRef {
    fn from(identity: &PlayerIdentity) -> Self {
        Self {
            user_id: identity.user_id(),
            name: identity.name().to_string(),
        }
    }
}

/// A deferred credit on the receiving player's record.
///
/// The receiver is owed `amount` at settlement; the payer's buy-in already
/// includes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: i64,
    pub reason: TransactionReason,
    pub from: PlayerRef,
}

/// One seat in the ledger.
///
/// Amounts are in currency subunits (1.20 is stored as 120).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub identity: PlayerIdentity,
    /// Total committed to the table, re-buys included
    pub buy_in: i64,
    /// Chips held at the end. `None` until the player settles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_stack: Option<i64>,
    #[serde(default)]
    pub additional_incomes: Vec<Transaction>,
}

impl Player {
    pub fn new(identity: PlayerIdentity, start_stack: i64) -> Self {
        Self {
            identity,
            buy_in: start_stack,
            finish_stack: None,
            additional_incomes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.identity.user_id()
    }

    /// Sum of every deferred credit owed to this player.
    pub fn incomes_total(&self) -> i128 {
        self.additional_incomes
            .iter()
            .map(|t| i128::from(t.amount))
            .sum()
    }
}
