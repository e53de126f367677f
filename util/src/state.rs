//! Application state container shared across Axum route handlers and services.

use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
///
/// Holds the SeaORM connection pool. Cloning is cheap; the pool is reference counted.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns an owned copy of the connection, for spawned tasks.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }
}
