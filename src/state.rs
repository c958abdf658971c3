//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: SqlitePool,
}

impl AppState {
    /// Create a new application state
    pub fn new(db: SqlitePool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { db }),
        }
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }
}
