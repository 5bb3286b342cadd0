//! Game use case implementation.
//!
//! `GameUseCase` is the surface a request layer talks to: every call names
//! the caller and the game, goes through [`SessionManager`] for lookup and
//! access checks, and then runs one ledger action on the live game.

use crate::session::SessionManager;
use ledger_core::config::ServiceSettings;
use ledger_core::error::Result;
use ledger_core::game::{GameData, Report, Totals};
use ledger_core::ids::{GameId, UserId};
use std::sync::Arc;

pub struct GameUseCase {
    manager: Arc<SessionManager>,
    /// Commit after every successful mutation
    auto_commit: bool,
}

impl GameUseCase {
    pub fn new(manager: Arc<SessionManager>, settings: &ServiceSettings) -> Self {
        Self {
            manager,
            auto_commit: settings.auto_commit,
        }
    }

    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    /// Creates a game in `org_name` organized by `requester`.
    pub async fn create_game(&self, requester: UserId, org_name: &str) -> Result<GameId> {
        let game = self.manager.create_game(requester, org_name).await?;
        Ok(game.id())
    }

    /// Seats a player, anonymous unless `user` is given.
    pub async fn append_player(
        &self,
        caller: UserId,
        game_id: GameId,
        user: Option<UserId>,
        name: &str,
        start_stack: i64,
    ) -> Result<()> {
        let game = self.manager.get_game(caller, game_id).await?;
        game.append_player(user, name, start_stack).await?;
        self.after_mutation(caller, game_id).await
    }

    pub async fn set_finish_stack(
        &self,
        caller: UserId,
        game_id: GameId,
        name: &str,
        stack: i64,
    ) -> Result<()> {
        let game = self.manager.get_game(caller, game_id).await?;
        game.set_finish_stack(name, stack).await?;
        self.after_mutation(caller, game_id).await
    }

    /// Re-buy paid to the bank.
    pub async fn re_buy_in(
        &self,
        caller: UserId,
        game_id: GameId,
        name: &str,
        amount: i64,
    ) -> Result<()> {
        let game = self.manager.get_game(caller, game_id).await?;
        game.re_buy_in(name, amount).await?;
        self.after_mutation(caller, game_id).await
    }

    /// Re-buy paid to another player, who is credited the amount.
    pub async fn re_buy_in_from_player(
        &self,
        caller: UserId,
        game_id: GameId,
        buyer: &str,
        seller: &str,
        amount: i64,
    ) -> Result<()> {
        let game = self.manager.get_game(caller, game_id).await?;
        game.re_buy_in_from_player(buyer, seller, amount).await?;
        self.after_mutation(caller, game_id).await
    }

    pub async fn verify(&self, caller: UserId, game_id: GameId) -> Result<Totals> {
        let game = self.manager.get_game(caller, game_id).await?;
        game.verify().await
    }

    pub async fn report(&self, caller: UserId, game_id: GameId) -> Result<Report> {
        let game = self.manager.get_game(caller, game_id).await?;
        game.report().await
    }

    pub async fn snapshot(&self, caller: UserId, game_id: GameId) -> Result<GameData> {
        let game = self.manager.get_game(caller, game_id).await?;
        Ok(game.snapshot().await)
    }

    pub async fn commit(&self, caller: UserId, game_id: GameId) -> Result<()> {
        self.manager.commit(caller, game_id).await
    }

    async fn after_mutation(&self, caller: UserId, game_id: GameId) -> Result<()> {
        if self.auto_commit {
            self.manager.commit(caller, game_id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::config::CacheSettings;
    use ledger_core::error::LedgerError;
    use ledger_core::game::GameRepository;
    use ledger_core::org::OrgRepository;
    use ledger_core::user::UserRepository;
    use ledger_infrastructure::memory::{
        InMemoryGameRepository, InMemoryOrgRepository, InMemoryUserRepository,
    };

    struct Fixture {
        usecase: GameUseCase,
        games: Arc<InMemoryGameRepository>,
        organizer: UserId,
        outsider: UserId,
    }

    async fn fixture(auto_commit: bool) -> Fixture {
        let games = Arc::new(InMemoryGameRepository::new());
        let orgs = Arc::new(InMemoryOrgRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let organizer = users.create("organizer", "").await.unwrap().id;
        let outsider = users.create("outsider", "").await.unwrap().id;
        orgs.create(organizer, "club1").await.unwrap();

        let manager = Arc::new(SessionManager::new(
            games.clone(),
            orgs,
            users,
            &CacheSettings::default(),
        ));
        Fixture {
            usecase: GameUseCase::new(manager, &ServiceSettings { auto_commit }),
            games,
            organizer,
            outsider,
        }
    }

    #[tokio::test]
    async fn test_mutations_stay_in_memory_until_commit() {
        let f = fixture(false).await;
        let id = f.usecase.create_game(f.organizer, "club1").await.unwrap();

        f.usecase
            .append_player(f.organizer, id, None, "alice", 100)
            .await
            .unwrap();

        let stored = f.games.find_by_id(id).await.unwrap().unwrap();
        assert!(stored.players.is_empty());
        assert_eq!(
            f.usecase.snapshot(f.organizer, id).await.unwrap().players.len(),
            1
        );

        f.usecase.commit(f.organizer, id).await.unwrap();
        let stored = f.games.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.players.len(), 1);
    }

    #[tokio::test]
    async fn test_auto_commit_persists_each_mutation() {
        let f = fixture(true).await;
        let id = f.usecase.create_game(f.organizer, "club1").await.unwrap();

        f.usecase
            .append_player(f.organizer, id, None, "alice", 100)
            .await
            .unwrap();
        f.usecase
            .append_player(f.organizer, id, Some(f.outsider), "bob", 100)
            .await
            .unwrap();
        f.usecase
            .re_buy_in_from_player(f.organizer, id, "alice", "bob", 50)
            .await
            .unwrap();

        let stored = f.games.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.player("alice").unwrap().buy_in, 150);
        assert_eq!(stored.player("bob").unwrap().additional_incomes.len(), 1);
        assert_eq!(stored.player("bob").unwrap().user_id(), Some(f.outsider));
    }

    #[tokio::test]
    async fn test_failed_mutation_does_not_commit() {
        let f = fixture(true).await;
        let id = f.usecase.create_game(f.organizer, "club1").await.unwrap();
        f.usecase
            .append_player(f.organizer, id, None, "alice", 100)
            .await
            .unwrap();

        let err = f
            .usecase
            .append_player(f.organizer, id, None, "alice", 100)
            .await
            .unwrap_err();

        assert_eq!(err, LedgerError::NameTaken("alice".to_string()));
        assert_eq!(
            f.games.find_by_id(id).await.unwrap().unwrap().players.len(),
            1
        );
    }

    #[tokio::test]
    async fn test_outsider_is_denied_every_action() {
        let f = fixture(false).await;
        let id = f.usecase.create_game(f.organizer, "club1").await.unwrap();

        let err = f.usecase.re_buy_in(f.outsider, id, "alice", 10).await.unwrap_err();
        assert!(err.is_permission_denied());
        assert!(f.usecase.report(f.outsider, id).await.unwrap_err().is_permission_denied());
        assert!(f.usecase.commit(f.outsider, id).await.unwrap_err().is_permission_denied());
    }

    #[tokio::test]
    async fn test_settlement_through_usecase() {
        let f = fixture(false).await;
        let id = f.usecase.create_game(f.organizer, "club1").await.unwrap();
        let u = &f.usecase;
        let me = f.organizer;

        u.append_player(me, id, None, "alice", 100).await.unwrap();
        u.append_player(me, id, None, "bob", 100).await.unwrap();
        assert!(matches!(
            u.verify(me, id).await,
            Err(LedgerError::SessionNotFinished { .. })
        ));

        u.re_buy_in(me, id, "bob", 40).await.unwrap();
        u.set_finish_stack(me, id, "alice", 160).await.unwrap();
        u.set_finish_stack(me, id, "bob", 80).await.unwrap();

        let totals = u.verify(me, id).await.unwrap();
        assert_eq!(totals.buy_ins, 240);
        assert!(totals.is_balanced());

        let report = u.report(me, id).await.unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(report.results[0].net, -60);
        assert_eq!(report.results[1].net, 60);
    }
}
