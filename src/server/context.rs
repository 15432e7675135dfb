//! Per-request storage access for the query service.
//!
//! The shared state is just the store path. Each request opens its own
//! read-only connection on the blocking pool, runs one query, and drops the
//! connection before the handler returns, on success and error alike.

use crate::db::schema;
use crate::error::{DbResult, ServerResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
        }
    }

    /// Store this service reads from
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection, run `query` on it, and release it
    pub async fn with_connection<T, F>(&self, query: F) -> ServerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> DbResult<T> + Send + 'static,
    {
        let db_path = Arc::clone(&self.db_path);
        let result = tokio::task::spawn_blocking(move || -> DbResult<T> {
            let conn = schema::open_read_only(&db_path)?;
            query(&conn)
        })
        .await?;

        Ok(result?)
    }
}
