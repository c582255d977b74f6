use async_trait::async_trait;
use thiserror::Error;

use crate::{auth::repo_types::User, logs::repo::LogEntry};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The username is already taken; the existing row was left untouched.
    #[error("username already exists")]
    Conflict,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistent account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

/// Append-only request audit trail.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn record(&self, method: &str, path: &str) -> Result<LogEntry, StoreError>;
}
