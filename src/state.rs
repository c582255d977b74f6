use std::sync::Arc;

use crate::{
    db::Database,
    store::{AuditStore, UserStore},
};

/// Handles every request needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub audit: Arc<dyn AuditStore>,
}

impl AppState {
    pub fn new(db: &Database) -> Self {
        Self {
            users: Arc::new(db.clone()),
            audit: Arc::new(db.clone()),
        }
    }

    #[cfg(test)]
    pub fn from_parts(users: Arc<dyn UserStore>, audit: Arc<dyn AuditStore>) -> Self {
        Self { users, audit }
    }
}
