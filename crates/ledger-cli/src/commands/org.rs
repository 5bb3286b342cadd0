use crate::app::App;
use anyhow::{Context, Result};
use ledger_core::ids::UserId;
use ledger_core::org::Org;

pub async fn create(app: &App, name: &str, admin: UserId) -> Result<Org> {
    let org = app
        .orgs
        .create(admin, name)
        .await
        .with_context(|| format!("cannot create organization '{}'", name))?;
    println!("{}", org.id);
    Ok(org)
}

pub async fn add_member(app: &App, caller: UserId, name: &str, user_id: UserId) -> Result<()> {
    let org = app
        .orgs
        .add_member(caller, name, user_id)
        .await
        .with_context(|| format!("cannot add {} to '{}'", user_id, name))?;
    println!("added {} to {}", user_id, org.name);
    Ok(())
}

/// Prints one `<id> <name>` line per organization the caller belongs to.
pub async fn list(app: &App, caller: UserId) -> Result<Vec<Org>> {
    let orgs = app.orgs.list_for_user(caller).await?;
    for org in &orgs {
        println!("{} {}", org.id, org.name);
    }
    Ok(orgs)
}
