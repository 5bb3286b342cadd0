use crate::app::App;
use anyhow::{Context, Result};
use ledger_core::game::{GameData, Report, Totals};
use ledger_core::ids::{GameId, UserId};

/// Commits unless the use case already did.
async fn finish(app: &App, caller: UserId, game_id: GameId) -> Result<()> {
    if !app.auto_commit {
        app.games
            .commit(caller, game_id)
            .await
            .with_context(|| format!("cannot commit game {}", game_id))?;
    }
    Ok(())
}

pub async fn create(app: &App, caller: UserId, org: &str) -> Result<GameId> {
    let game_id = app
        .games
        .create_game(caller, org)
        .await
        .with_context(|| format!("cannot create a game in '{}'", org))?;
    println!("{}", game_id);
    Ok(game_id)
}

pub async fn add_player(
    app: &App,
    caller: UserId,
    game_id: GameId,
    name: &str,
    stack: i64,
    user: Option<UserId>,
) -> Result<()> {
    app.games
        .append_player(caller, game_id, user, name, stack)
        .await
        .with_context(|| format!("cannot add player '{}'", name))?;
    finish(app, caller, game_id).await
}

pub async fn set_finish_stack(
    app: &App,
    caller: UserId,
    game_id: GameId,
    name: &str,
    stack: i64,
) -> Result<()> {
    app.games
        .set_finish_stack(caller, game_id, name, stack)
        .await
        .with_context(|| format!("cannot set the final stack of '{}'", name))?;
    finish(app, caller, game_id).await
}

pub async fn re_buy(
    app: &App,
    caller: UserId,
    game_id: GameId,
    name: &str,
    amount: i64,
) -> Result<()> {
    app.games
        .re_buy_in(caller, game_id, name, amount)
        .await
        .with_context(|| format!("cannot re-buy for '{}'", name))?;
    finish(app, caller, game_id).await
}

pub async fn re_buy_from(
    app: &App,
    caller: UserId,
    game_id: GameId,
    buyer: &str,
    seller: &str,
    amount: i64,
) -> Result<()> {
    app.games
        .re_buy_in_from_player(caller, game_id, buyer, seller, amount)
        .await
        .with_context(|| format!("cannot re-buy for '{}' from '{}'", buyer, seller))?;
    finish(app, caller, game_id).await
}

pub async fn verify(app: &App, caller: UserId, game_id: GameId) -> Result<Totals> {
    let totals = app.games.verify(caller, game_id).await?;
    println!(
        "balanced: buy-ins {} == buy-outs {}",
        totals.buy_ins, totals.buy_outs
    );
    Ok(totals)
}

pub async fn report(app: &App, caller: UserId, game_id: GameId) -> Result<Report> {
    let report = app.games.report(caller, game_id).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report)
}

pub async fn show(app: &App, caller: UserId, game_id: GameId) -> Result<GameData> {
    let data = app.games.snapshot(caller, game_id).await?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(data)
}
