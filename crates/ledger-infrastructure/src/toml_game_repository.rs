//! TOML-based GameRepository implementation

use crate::dto::GameV1_0_0;
use crate::paths::LedgerPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use ledger_core::clock::{Clock, SystemClock};
use ledger_core::error::{LedgerError, Result};
use ledger_core::game::{GameData, GameRepository};
use ledger_core::ids::{GameId, OrgId, UserId};
use std::fs;
use std::sync::Arc;

/// Stores each game as its own TOML document.
///
/// ```text
/// data_dir/
/// └── games/
///     ├── <game-id-1>.toml
///     └── <game-id-2>.toml
/// ```
///
/// Documents go through `GameV1_0_0`, so the file layout is independent of
/// the domain types.
pub struct TomlGameRepository {
    paths: LedgerPaths,
    clock: Arc<dyn Clock>,
}

impl TomlGameRepository {
    /// Creates the repository and its `games/` directory.
    pub fn new(paths: LedgerPaths) -> Result<Self> {
        Self::with_clock(paths, Arc::new(SystemClock))
    }

    pub fn with_clock(paths: LedgerPaths, clock: Arc<dyn Clock>) -> Result<Self> {
        fs::create_dir_all(paths.games_dir())
            .map_err(|e| LedgerError::infrastructure("create games directory", e))?;
        Ok(Self { paths, clock })
    }

    fn file(&self, id: GameId) -> AtomicTomlFile<GameV1_0_0> {
        AtomicTomlFile::new(self.paths.game_file(id))
    }

    /// Ids of every stored game, in no particular order.
    pub fn list_ids(&self) -> Result<Vec<GameId>> {
        let entries = fs::read_dir(self.paths.games_dir())
            .map_err(|e| LedgerError::infrastructure("list games", e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| LedgerError::infrastructure("list games", e))?
                .path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                if let Some(id) = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(|stem| stem.parse::<GameId>().ok())
                {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }
}

#[async_trait]
impl GameRepository for TomlGameRepository {
    async fn create(&self, organizer: UserId, organization: OrgId) -> Result<GameData> {
        let data = GameData::new(organizer, organization, self.clock.now());
        self.file(data.id).save(&GameV1_0_0::from(&data))?;
        tracing::debug!(game_id = %data.id, "game document created");
        Ok(data)
    }

    async fn replace(&self, game: &GameData) -> Result<()> {
        let file = self.file(game.id);
        if !file.path().exists() {
            return Err(LedgerError::SessionNotFound(game.id));
        }
        file.save(&GameV1_0_0::from(game))?;
        tracing::debug!(game_id = %game.id, players = game.players.len(), "game document replaced");
        Ok(())
    }

    async fn find_by_id(&self, id: GameId) -> Result<Option<GameData>> {
        self.file(id)
            .load()?
            .map(GameData::try_from)
            .transpose()
    }
}
