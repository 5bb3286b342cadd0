//! Settlement: balance checks and per-player results.

use super::player::Player;
use crate::error::{LedgerError, Result};
use crate::ids::{GameId, UserId};
use serde::{Deserialize, Serialize};

/// Ledger totals of a fully settled game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Σ buy-in
    pub buy_ins: i128,
    /// Σ final stack + Σ transaction amounts
    pub buy_outs: i128,
}

impl Totals {
    pub fn is_balanced(&self) -> bool {
        self.buy_ins == self.buy_outs
    }
}

/// One line of the settlement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub buy_in: i64,
    pub finish_stack: i64,
    /// Deferred credits owed to the player
    pub incomes: i128,
    /// `buy_in - (finish_stack + incomes)`. Positive means the player lost
    /// that much, negative means they won it.
    pub net: i128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub game_id: GameId,
    pub results: Vec<PlayerResult>,
}

impl Report {
    /// Zero exactly when the game balances.
    pub fn total(&self) -> i128 {
        self.results.iter().map(|r| r.net).sum()
    }
}

/// Names of players that still have no final stack, in seat order.
fn pending(players: &[Player]) -> Vec<String> {
    players
        .iter()
        .filter(|p| p.finish_stack.is_none())
        .map(|p| p.name().to_string())
        .collect()
}

fn ensure_finished(players: &[Player]) -> Result<()> {
    let pending = pending(players);
    if pending.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::SessionNotFinished { pending })
    }
}

/// Sums both sides of the ledger. Fails if anyone is still playing.
pub fn totals(players: &[Player]) -> Result<Totals> {
    ensure_finished(players)?;

    let mut totals = Totals {
        buy_ins: 0,
        buy_outs: 0,
    };
    for p in players {
        totals.buy_ins += i128::from(p.buy_in);
        totals.buy_outs += i128::from(p.finish_stack.unwrap_or_default()) + p.incomes_total();
    }
    Ok(totals)
}

/// Succeeds when every player settled and the ledger balances.
pub fn verify(players: &[Player]) -> Result<Totals> {
    let totals = totals(players)?;
    if !totals.is_balanced() {
        return Err(LedgerError::StackInconsistent {
            buy_ins: totals.buy_ins,
            buy_outs: totals.buy_outs,
        });
    }
    Ok(totals)
}

/// Per-player net results. Requires every final stack, not a balanced ledger.
pub fn report(game_id: GameId, players: &[Player]) -> Result<Report> {
    ensure_finished(players)?;

    let results = players
        .iter()
        .map(|p| {
            let finish_stack = p.finish_stack.unwrap_or_default();
            let incomes = p.incomes_total();
            PlayerResult {
                name: p.name().to_string(),
                user_id: p.user_id(),
                buy_in: p.buy_in,
                finish_stack,
                incomes,
                net: i128::from(p.buy_in) - (i128::from(finish_stack) + incomes),
            }
        })
        .collect();

    Ok(Report { game_id, results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::{PlayerIdentity, PlayerRef, Transaction, TransactionReason};

    fn player(name: &str, buy_in: i64, finish: Option<i64>) -> Player {
        Player {
            identity: PlayerIdentity::Anonymous {
                name: name.to_string(),
            },
            buy_in,
            finish_stack: finish,
            additional_incomes: Vec::new(),
        }
    }

    #[test]
    fn test_unsettled_players_are_listed() {
        let players = vec![
            player("alice", 100, Some(100)),
            player("bob", 100, None),
            player("carol", 100, None),
        ];
        assert_eq!(
            verify(&players),
            Err(LedgerError::SessionNotFinished {
                pending: vec!["bob".to_string(), "carol".to_string()]
            })
        );
        assert!(matches!(
            report(GameId::new(), &players),
            Err(LedgerError::SessionNotFinished { .. })
        ));
    }

    #[test]
    fn test_empty_game_balances() {
        assert_eq!(
            verify(&[]),
            Ok(Totals {
                buy_ins: 0,
                buy_outs: 0
            })
        );
    }

    #[test]
    fn test_imbalance_is_reported() {
        let players = vec![player("alice", 100, Some(60)), player("bob", 100, Some(130))];
        assert_eq!(
            verify(&players),
            Err(LedgerError::StackInconsistent {
                buy_ins: 200,
                buy_outs: 190
            })
        );
    }

    #[test]
    fn test_transactions_count_as_buy_outs() {
        let mut bob = player("bob", 100, Some(130));
        bob.additional_incomes.push(Transaction {
            amount: 50,
            reason: TransactionReason::PeerReBuy,
            from: PlayerRef {
                user_id: None,
                name: "alice".to_string(),
            },
        });
        let players = vec![player("alice", 150, Some(70)), bob];

        assert!(verify(&players).is_ok());

        let report = report(GameId::new(), &players).unwrap();
        assert_eq!(report.results[0].net, 80);
        assert_eq!(report.results[1].net, -80);
        assert_eq!(report.results[1].incomes, 50);
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_report_of_unbalanced_game_does_not_sum_to_zero() {
        let players = vec![player("alice", 100, Some(90)), player("bob", 100, Some(100))];
        let report = report(GameId::new(), &players).unwrap();
        assert_eq!(report.total(), 10);
    }

    #[test]
    fn test_extreme_amounts_do_not_overflow() {
        let players = vec![
            player("alice", i64::MAX, Some(i64::MAX)),
            player("bob", i64::MAX, Some(i64::MAX)),
        ];
        let totals = verify(&players).unwrap();
        assert_eq!(totals.buy_ins, 2 * i128::from(i64::MAX));
    }
}
