use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledger_core::ids::{GameId, UserId};
use ledger_infrastructure::config_service::load_config;
use std::path::PathBuf;

mod app;
mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "poker-ledger")]
#[command(about = "Poker Ledger - buy-ins, re-buys and settlement for home games", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory, overrides the configuration
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage registered users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage organizations
    Org {
        #[command(subcommand)]
        action: OrgAction,
    },
    /// Run games
    Game {
        #[command(subcommand)]
        action: GameAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a user and print its id
    Add {
        username: String,
        #[arg(long, default_value = "")]
        email: String,
    },
}

#[derive(Subcommand)]
enum OrgAction {
    /// Create an organization and print its id
    Create {
        name: String,
        #[arg(long)]
        admin: UserId,
    },
    /// Add a user to an organization the caller belongs to
    AddMember {
        #[arg(long = "as")]
        caller: UserId,
        name: String,
        user_id: UserId,
    },
    /// List the caller's organizations
    List {
        #[arg(long = "as")]
        caller: UserId,
    },
}

#[derive(Subcommand)]
enum GameAction {
    /// Start a game and print its id
    Create {
        #[arg(long = "as")]
        caller: UserId,
        #[arg(long)]
        org: String,
    },
    /// Seat a player
    AddPlayer {
        #[arg(long = "as")]
        caller: UserId,
        game_id: GameId,
        name: String,
        #[arg(allow_negative_numbers = true)]
        stack: i64,
        /// Registered user behind the seat
        #[arg(long)]
        user: Option<UserId>,
    },
    /// Record a player's final stack
    Finish {
        #[arg(long = "as")]
        caller: UserId,
        game_id: GameId,
        name: String,
        #[arg(allow_negative_numbers = true)]
        stack: i64,
    },
    /// Re-buy paid to the bank
    Rebuy {
        #[arg(long = "as")]
        caller: UserId,
        game_id: GameId,
        name: String,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Re-buy paid to another player
    RebuyFrom {
        #[arg(long = "as")]
        caller: UserId,
        game_id: GameId,
        buyer: String,
        seller: String,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Check that the ledger balances
    Verify {
        #[arg(long = "as")]
        caller: UserId,
        game_id: GameId,
    },
    /// Print per-player results as JSON
    Report {
        #[arg(long = "as")]
        caller: UserId,
        game_id: GameId,
    },
    /// Print the whole game as JSON
    Show {
        #[arg(long = "as")]
        caller: UserId,
        game_id: GameId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("cannot load configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = Some(data_dir);
    }
    logging::init(&config.logging);

    let app = app::App::open(&config)?;

    match cli.command {
        Commands::User { action } => match action {
            UserAction::Add { username, email } => {
                commands::user::add(&app, &username, &email).await?;
            }
        },
        Commands::Org { action } => match action {
            OrgAction::Create { name, admin } => {
                commands::org::create(&app, &name, admin).await?;
            }
            OrgAction::AddMember {
                caller,
                name,
                user_id,
            } => commands::org::add_member(&app, caller, &name, user_id).await?,
            OrgAction::List { caller } => {
                commands::org::list(&app, caller).await?;
            }
        },
        Commands::Game { action } => match action {
            GameAction::Create { caller, org } => {
                commands::game::create(&app, caller, &org).await?;
            }
            GameAction::AddPlayer {
                caller,
                game_id,
                name,
                stack,
                user,
            } => commands::game::add_player(&app, caller, game_id, &name, stack, user).await?,
            GameAction::Finish {
                caller,
                game_id,
                name,
                stack,
            } => commands::game::set_finish_stack(&app, caller, game_id, &name, stack).await?,
            GameAction::Rebuy {
                caller,
                game_id,
                name,
                amount,
            } => commands::game::re_buy(&app, caller, game_id, &name, amount).await?,
            GameAction::RebuyFrom {
                caller,
                game_id,
                buyer,
                seller,
                amount,
            } => {
                commands::game::re_buy_from(&app, caller, game_id, &buyer, &seller, amount).await?
            }
            GameAction::Verify { caller, game_id } => {
                commands::game::verify(&app, caller, game_id).await?;
            }
            GameAction::Report { caller, game_id } => {
                commands::game::report(&app, caller, game_id).await?;
            }
            GameAction::Show { caller, game_id } => {
                commands::game::show(&app, caller, game_id).await?;
            }
        },
    }

    Ok(())
}
