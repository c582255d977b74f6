use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{
    db::Database,
    store::{AuditStore, StoreError},
};

/// One audited request, `"<METHOD> <PATH>"`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LogEntry {
    pub id: i64,
    pub message: String,
    pub created_at: OffsetDateTime,
}

pub fn format_message(method: &str, path: &str) -> String {
    format!("{method} {path}")
}

#[async_trait]
impl AuditStore for Database {
    async fn record(&self, method: &str, path: &str) -> Result<LogEntry, StoreError> {
        let entry = sqlx::query_as::<_, LogEntry>(
            r#"
            INSERT INTO logs (message)
            VALUES (?1)
            RETURNING id, message, created_at
            "#,
        )
        .bind(format_message(method, path))
        .fetch_one(self.pool())
        .await?;
        Ok(entry)
    }
}
