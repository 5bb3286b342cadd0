//! Full game lifecycle against the file-backed repositories.

use ledger_application::{GameUseCase, SessionManager};
use ledger_core::config::{CacheSettings, ServiceSettings};
use ledger_core::org::OrgRepository;
use ledger_core::user::UserRepository;
use ledger_core::LedgerError;
use ledger_infrastructure::{LedgerPaths, TomlDirectory, TomlGameRepository};
use std::sync::Arc;
use tempfile::TempDir;

fn usecase(paths: &LedgerPaths, auto_commit: bool) -> GameUseCase {
    let directory = Arc::new(TomlDirectory::new(paths));
    let games = Arc::new(TomlGameRepository::new(paths.clone()).unwrap());
    let manager = SessionManager::new(
        games,
        directory.clone(),
        directory,
        &CacheSettings::default(),
    );
    GameUseCase::new(Arc::new(manager), &ServiceSettings { auto_commit })
}

#[tokio::test]
async fn test_game_survives_process_restart() {
    let temp_dir = TempDir::new().unwrap();
    let paths = LedgerPaths::new(temp_dir.path());

    let directory = TomlDirectory::new(&paths);
    let admin = UserRepository::create(&directory, "admin", "").await.unwrap();
    let alice = UserRepository::create(&directory, "alice", "").await.unwrap();
    OrgRepository::create(&directory, admin.id, "club1")
        .await
        .unwrap();

    let first = usecase(&paths, false);
    let id = first.create_game(admin.id, "club1").await.unwrap();
    first
        .append_player(admin.id, id, Some(alice.id), "Alice", 100)
        .await
        .unwrap();
    first
        .append_player(admin.id, id, None, "Bob", 100)
        .await
        .unwrap();
    first
        .re_buy_in_from_player(admin.id, id, "Alice", "Bob", 50)
        .await
        .unwrap();
    first.commit(admin.id, id).await.unwrap();

    // Uncommitted changes are lost with the process.
    first.set_finish_stack(admin.id, id, "Alice", 1).await.unwrap();
    drop(first);

    let second = usecase(&paths, true);
    let snapshot = second.snapshot(admin.id, id).await.unwrap();
    let stored_alice = snapshot.player("Alice").unwrap();
    assert_eq!(stored_alice.user_id(), Some(alice.id));
    assert_eq!(stored_alice.buy_in, 150);
    assert_eq!(stored_alice.finish_stack, None);
    assert_eq!(snapshot.player("Bob").unwrap().additional_incomes.len(), 1);

    second.set_finish_stack(admin.id, id, "Alice", 70).await.unwrap();
    second.set_finish_stack(admin.id, id, "Bob", 130).await.unwrap();
    drop(second);

    let third = usecase(&paths, false);
    let report = third.report(admin.id, id).await.unwrap();
    assert_eq!(report.total(), 0);
    assert_eq!(report.results[0].net, 80);
    assert_eq!(report.results[1].net, -80);
}

#[tokio::test]
async fn test_non_member_cannot_open_stored_game() {
    let temp_dir = TempDir::new().unwrap();
    let paths = LedgerPaths::new(temp_dir.path());
    let directory = TomlDirectory::new(&paths);
    let admin = UserRepository::create(&directory, "admin", "").await.unwrap();
    let stranger = UserRepository::create(&directory, "stranger", "").await.unwrap();
    let org = OrgRepository::create(&directory, admin.id, "club1")
        .await
        .unwrap();

    let id = usecase(&paths, false)
        .create_game(admin.id, "club1")
        .await
        .unwrap();

    let err = usecase(&paths, false)
        .snapshot(stranger.id, id)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientPermissions {
            user_id: stranger.id,
            org_id: org.id,
        }
    );
}
