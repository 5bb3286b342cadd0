//! The live game aggregate.

use super::data::GameData;
use super::player::{Player, PlayerIdentity, PlayerRef, Transaction, TransactionReason};
use super::report::{self, Report, Totals};
use super::repository::GameRepository;
use crate::error::{LedgerError, Result};
use crate::ids::{GameId, OrgId, UserId};
use crate::user::UserRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mutable part of a game, guarded by the game lock.
#[derive(Debug)]
struct LedgerState {
    players: Vec<Player>,
    /// Bumped by every successful mutation.
    revision: u64,
    /// Last revision known to be in the store.
    committed_revision: u64,
}

impl LedgerState {
    fn position(&self, name: &str) -> Result<usize> {
        self.players
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| LedgerError::PlayerNotFound(name.to_string()))
    }

    fn is_dirty(&self) -> bool {
        self.revision != self.committed_revision
    }
}

/// One live poker session.
///
/// Every operation holds the game lock from start to finish, so reads and
/// writes on a single game are strictly serialized. Mutations validate before
/// they write: a failed call leaves the ledger untouched.
pub struct Game {
    id: GameId,
    organizer: UserId,
    organization: OrgId,
    started_at: DateTime<Utc>,
    state: Mutex<LedgerState>,
    users: Arc<dyn UserRepository>,
}

impl Game {
    /// Wraps stored data. The result is considered committed.
    pub fn from_data(data: GameData, users: Arc<dyn UserRepository>) -> Self {
        Self {
            id: data.id,
            organizer: data.organizer,
            organization: data.organization,
            started_at: data.started_at,
            state: Mutex::new(LedgerState {
                players: data.players,
                revision: 0,
                committed_revision: 0,
            }),
            users,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn organizer(&self) -> UserId {
        self.organizer
    }

    pub fn organization(&self) -> OrgId {
        self.organization
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Seats a new player.
    ///
    /// A registered player is resolved through the user repository first;
    /// `name` is the display name used by every other operation.
    pub async fn append_player(
        &self,
        user: Option<UserId>,
        name: &str,
        start_stack: i64,
    ) -> Result<()> {
        let mut state = self.state.lock().await;

        if start_stack < 0 {
            return Err(self.rejected(LedgerError::invalid_amount(
                start_stack,
                "start stack cannot be negative",
            )));
        }
        if state.players.iter().any(|p| p.name() == name) {
            return Err(self.rejected(LedgerError::NameTaken(name.to_string())));
        }

        let identity = match user {
            None => PlayerIdentity::Anonymous {
                name: name.to_string(),
            },
            Some(user_id) => {
                let found = self
                    .users
                    .find_by_id(user_id)
                    .await
                    .map_err(|e| e.context("resolve player identity"))?;
                match found {
                    Some(user) => PlayerIdentity::Registered {
                        user_id: user.id,
                        name: name.to_string(),
                    },
                    None => return Err(self.rejected(LedgerError::UserNotFound(user_id))),
                }
            }
        };

        state.players.push(Player::new(identity, start_stack));
        state.revision += 1;

        tracing::info!(
            game_id = %self.id,
            player = name,
            registered = user.is_some(),
            start_stack,
            "player joined the game"
        );
        Ok(())
    }

    /// Records the chips a player leaves with. Repeat calls overwrite.
    pub async fn set_finish_stack(&self, name: &str, stack: i64) -> Result<()> {
        let mut state = self.state.lock().await;

        let idx = state.position(name).map_err(|e| self.rejected(e))?;
        if stack < 0 {
            return Err(self.rejected(LedgerError::invalid_amount(
                stack,
                "finish stack cannot be negative",
            )));
        }

        let previous = state.players[idx].finish_stack.replace(stack);
        state.revision += 1;

        if let Some(previous) = previous {
            tracing::warn!(
                game_id = %self.id,
                player = name,
                previous,
                stack,
                "finish stack overwritten"
            );
        } else {
            tracing::info!(game_id = %self.id, player = name, stack, "player finished the game");
        }
        Ok(())
    }

    /// Bank-funded re-buy: the player's buy-in grows by `amount`.
    pub async fn re_buy_in(&self, name: &str, amount: i64) -> Result<()> {
        let mut state = self.state.lock().await;

        let idx = state.position(name).map_err(|e| self.rejected(e))?;
        let buy_in = self
            .grow_buy_in(state.players[idx].buy_in, amount)
            .map_err(|e| self.rejected(e))?;

        state.players[idx].buy_in = buy_in;
        state.revision += 1;

        tracing::info!(game_id = %self.id, player = name, amount, buy_in, "re-buy-in from the bank");
        Ok(())
    }

    /// Re-buy paid by another player.
    ///
    /// The buyer's buy-in grows by `amount` and the seller is credited the same
    /// amount as a deferred transaction, refunded at settlement.
    pub async fn re_buy_in_from_player(&self, buyer: &str, seller: &str, amount: i64) -> Result<()> {
        let mut state = self.state.lock().await;

        let buyer_idx = state.position(buyer).map_err(|e| self.rejected(e))?;
        let seller_idx = state.position(seller).map_err(|e| self.rejected(e))?;
        let buy_in = self
            .grow_buy_in(state.players[buyer_idx].buy_in, amount)
            .map_err(|e| self.rejected(e))?;

        let from = PlayerRef::from(&state.players[buyer_idx].identity);
        state.players[seller_idx]
            .additional_incomes
            .push(Transaction {
                amount,
                reason: TransactionReason::PeerReBuy,
                from,
            });
        state.players[buyer_idx].buy_in = buy_in;
        state.revision += 1;

        tracing::info!(
            game_id = %self.id,
            buyer,
            seller,
            amount,
            "re-buy-in from another player"
        );
        Ok(())
    }

    /// Checks that everyone settled and that the ledger balances.
    pub async fn verify(&self) -> Result<Totals> {
        let state = self.state.lock().await;
        report::verify(&state.players).map_err(|e| self.rejected(e))
    }

    /// Net result per player. Fails with `SessionNotFinished` while anyone is
    /// still playing.
    pub async fn report(&self) -> Result<Report> {
        let state = self.state.lock().await;
        report::report(self.id, &state.players).map_err(|e| self.rejected(e))
    }

    pub async fn snapshot(&self) -> GameData {
        let state = self.state.lock().await;
        self.data(&state)
    }

    pub async fn player(&self, name: &str) -> Option<Player> {
        let state = self.state.lock().await;
        state.players.iter().find(|p| p.name() == name).cloned()
    }

    pub async fn player_count(&self) -> usize {
        self.state.lock().await.players.len()
    }

    /// True when the ledger changed since the last recorded commit.
    pub async fn is_dirty(&self) -> bool {
        self.state.lock().await.is_dirty()
    }

    /// Non-blocking dirtiness check. `None` while someone holds the lock.
    pub fn try_is_dirty(&self) -> Option<bool> {
        self.state.try_lock().ok().map(|state| state.is_dirty())
    }

    /// Writes the current ledger to `store` and marks it committed.
    ///
    /// The game lock is held across the write, so concurrent commits of one
    /// game land in order. On failure the ledger stays dirty and unchanged;
    /// memory and store may then differ until the next successful commit.
    pub async fn persist(&self, store: &dyn GameRepository) -> Result<u64> {
        let mut state = self.state.lock().await;

        let data = self.data(&state);
        store.replace(&data).await?;

        state.committed_revision = state.revision;
        Ok(state.revision)
    }

    fn data(&self, state: &LedgerState) -> GameData {
        GameData {
            id: self.id,
            organizer: self.organizer,
            organization: self.organization,
            started_at: self.started_at,
            players: state.players.clone(),
        }
    }

    fn grow_buy_in(&self, buy_in: i64, amount: i64) -> Result<i64> {
        if amount <= 0 {
            return Err(LedgerError::invalid_amount(
                amount,
                "re-buy amount must be positive",
            ));
        }
        buy_in
            .checked_add(amount)
            .ok_or_else(|| LedgerError::invalid_amount(amount, "buy-in would overflow"))
    }

    fn rejected(&self, err: LedgerError) -> LedgerError {
        tracing::warn!(game_id = %self.id, error = %err, "game operation rejected");
        err
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("id", &self.id)
            .field("organizer", &self.organizer)
            .field("organization", &self.organization)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
