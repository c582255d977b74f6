use anyhow::Context;
use tracing::{debug, info};

use crate::{
    auth::password,
    store::{StoreError, UserStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoAccount {
    Created,
    AlreadyPresent,
}

/// Insert the demo account unless it exists. Skips request validation on purpose:
/// the default demo password is shorter than the signup minimum.
pub async fn ensure_demo_user(
    users: &dyn UserStore,
    username: &str,
    plain_password: &str,
) -> anyhow::Result<DemoAccount> {
    let plain = plain_password.to_owned();
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .context("demo password hashing task panicked")??;

    match users.create(username, &hash).await {
        Ok(user) => {
            info!(user_id = user.id, %username, "demo user created");
            Ok(DemoAccount::Created)
        }
        Err(StoreError::Conflict) => {
            debug!(%username, "demo user already present");
            Ok(DemoAccount::AlreadyPresent)
        }
        Err(e) => Err(e).context("create demo user"),
    }
}
