use anyhow::{Context, Result};
use ledger_application::{GameUseCase, OrgUseCase, SessionManager};
use ledger_core::config::LedgerConfig;
use ledger_infrastructure::{LedgerPaths, TomlDirectory, TomlGameRepository};
use std::sync::Arc;

/// Everything a command needs, wired over one data directory.
pub struct App {
    pub directory: Arc<TomlDirectory>,
    pub games: GameUseCase,
    pub orgs: OrgUseCase,
    /// Whether the use case already commits after each mutation
    pub auto_commit: bool,
}

impl App {
    pub fn open(config: &LedgerConfig) -> Result<Self> {
        let paths = LedgerPaths::resolve(config.storage.data_dir.as_deref())
            .context("cannot resolve the data directory")?;
        tracing::debug!(data_dir = %paths.data_dir().display(), "opening ledger");

        let directory = Arc::new(TomlDirectory::new(&paths));
        let game_repository = Arc::new(
            TomlGameRepository::new(paths).context("cannot open the games directory")?,
        );
        let manager = SessionManager::new(
            game_repository,
            directory.clone(),
            directory.clone(),
            &config.cache,
        );

        Ok(Self {
            orgs: OrgUseCase::new(directory.clone(), directory.clone()),
            directory,
            games: GameUseCase::new(Arc::new(manager), &config.service),
            auto_commit: config.service.auto_commit,
        })
    }
}
