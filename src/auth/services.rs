use anyhow::Context;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest},
        password,
        repo_types::User,
    },
    error::ApiError,
    store::{StoreError, UserStore},
};

// Argon2 is CPU-bound; keep it off the async workers.
async fn hash_off_thread(plain: String) -> Result<String, ApiError> {
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .context("password hashing task panicked")??;
    Ok(hash)
}

async fn verify_off_thread(plain: String, hash: String) -> Result<bool, ApiError> {
    let ok = tokio::task::spawn_blocking(move || password::verify_password(&plain, &hash))
        .await
        .context("password verification task panicked")?;
    Ok(ok)
}

async fn dummy_verify_off_thread(plain: String) -> Result<(), ApiError> {
    tokio::task::spawn_blocking(move || password::dummy_verify(&plain))
        .await
        .context("password verification task panicked")?;
    Ok(())
}

/// Hash the password and insert the account. Expects an already validated request.
pub async fn register_user(users: &dyn UserStore, req: SignupRequest) -> Result<User, ApiError> {
    let SignupRequest { username, password } = req;
    let hash = hash_off_thread(password).await?;

    match users.create(&username, &hash).await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "user registered");
            Ok(user)
        }
        Err(StoreError::Conflict) => {
            warn!(%username, "username already exists");
            Err(ApiError::UsernameTaken)
        }
        Err(e) => Err(ApiError::Storage(e)),
    }
}

/// Check credentials. Unknown user and wrong password are indistinguishable to the caller.
pub async fn authenticate(users: &dyn UserStore, req: LoginRequest) -> Result<User, ApiError> {
    let LoginRequest { username, password } = req;

    let Some(user) = users.find_by_username(&username).await? else {
        dummy_verify_off_thread(password).await?;
        warn!(%username, "login unknown username");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_off_thread(password, user.password_hash.clone()).await? {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(user)
}


#[cfg(test)]
mod tests {
    use super::fakes::FakeUsers;
    use super::*;

    fn signup(u: &str, p: &str) -> SignupRequest {
        SignupRequest {
            username: u.into(),
            password: p.into(),
        }
    }

    fn login(u: &str, p: &str) -> LoginRequest {
        LoginRequest {
            username: u.into(),
            password: p.into(),
        }
    }

    #[tokio::test]
    async fn register_stores_verifiable_hash() {
        let users = FakeUsers::default();
        let user = register_user(&users, signup("alice", "secret1")).await.unwrap();

        assert_ne!(user.password_hash, "secret1");
        assert!(password::verify_password("secret1", &user.password_hash));
        assert_eq!(users.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn register_twice_is_username_taken() {
        let users = FakeUsers::default();
        register_user(&users, signup("alice", "secret1")).await.unwrap();
        let err = register_user(&users, signup("alice", "secret2")).await.unwrap_err();

        assert!(matches!(err, ApiError::UsernameTaken));
        assert_eq!(users.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn register_store_failure_is_storage_error() {
        let users = FakeUsers::broken();
        let err = register_user(&users, signup("alice", "secret1")).await.unwrap_err();
        assert!(matches!(err, ApiError::Storage(StoreError::Database(_))));
    }

    #[tokio::test]
    async fn authenticate_accepts_correct_password() {
        let users = FakeUsers::default();
        register_user(&users, signup("alice", "secret1")).await.unwrap();
        let user = authenticate(&users, login("alice", "secret1")).await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_fail_the_same_way() {
        let users = FakeUsers::default();
        register_user(&users, signup("alice", "secret1")).await.unwrap();

        let wrong = authenticate(&users, login("alice", "nope")).await.unwrap_err();
        let ghost = authenticate(&users, login("bob", "secret1")).await.unwrap_err();
        assert!(matches!(wrong, ApiError::InvalidCredentials));
        assert!(matches!(ghost, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_invalid_credentials() {
        let users = FakeUsers::default();
        users.create("mallory", "not-a-hash").await.unwrap();
        let err = authenticate(&users, login("mallory", "anything")).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn authenticate_lookup_failure_is_storage_error() {
        let users = FakeUsers::broken();
        let err = authenticate(&users, login("alice", "secret1")).await.unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
    }
}
