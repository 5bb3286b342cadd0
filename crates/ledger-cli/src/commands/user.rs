use crate::app::App;
use anyhow::{Context, Result};
use ledger_core::ids::UserId;
use ledger_core::user::UserRepository;

pub async fn add(app: &App, username: &str, email: &str) -> Result<UserId> {
    let user = UserRepository::create(app.directory.as_ref(), username, email)
        .await
        .with_context(|| format!("cannot add user '{}'", username))?;
    println!("{}", user.id);
    Ok(user.id)
}
