use assistant::Assistant;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub assistant: Arc<dyn Assistant>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, assistant: Arc<dyn Assistant>) -> Self {
        Self { db, assistant }
    }
}
