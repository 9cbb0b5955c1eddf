use crate::local::error::LocalStoreError;
use crate::local::store::LocalStore;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::task;
use tracing::{debug, error, info};

/// A SQLite implementation of the LocalStore trait
pub struct SqliteLocalStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteLocalStore {
    /// Open (or create) the store at `db_path`; `:memory:` keeps it in memory
    pub fn new(db_path: &str) -> Result<Self, LocalStoreError> {
        info!("Opening SQLite local store at path: {db_path}");

        if db_path != ":memory:" {
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    debug!("Creating parent directory: {:?}", parent);
                    fs::create_dir_all(parent).map_err(|e| {
                        error!("Failed to create directory {parent:?}: {e}");
                        LocalStoreError::OpenError(format!("Failed to create directory: {e}"))
                    })?;
                }
            }
        }

        let connection = Connection::open(db_path).map_err(|e| {
            error!("Failed to open SQLite database at {db_path}: {e}");
            LocalStoreError::OpenError(format!("Failed to open SQLite database: {e}"))
        })?;

        connection
            .execute(
                "CREATE TABLE IF NOT EXISTS local_state (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                [],
            )
            .map_err(|e| {
                error!("Failed to create local_state table: {e}");
                LocalStoreError::OpenError(format!("Failed to create local_state table: {e}"))
            })?;

        info!("SQLite local store initialized successfully at: {db_path}");
        Ok(SqliteLocalStore {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

#[async_trait]
impl LocalStore for SqliteLocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        let connection = Arc::clone(&self.connection);
        let key = key.to_string();

        task::spawn_blocking(move || {
            let conn = connection.lock().map_err(|_| {
                error!("Failed to acquire database lock");
                LocalStoreError::Locked
            })?;

            conn.query_row(
                "SELECT value FROM local_state WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| {
                error!("Failed to read key {key}: {e}");
                LocalStoreError::OperationError(format!("Failed to read key: {e}"))
            })
        })
        .await
        .map_err(|e| {
            error!("Task panic while reading key: {e}");
            LocalStoreError::OperationError(format!("Task panic: {e}"))
        })?
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        let connection = Arc::clone(&self.connection);
        let key = key.to_string();
        let value = value.to_string();
        let updated_at = Utc::now().to_rfc3339();

        task::spawn_blocking(move || {
            let conn = connection.lock().map_err(|_| {
                error!("Failed to acquire database lock");
                LocalStoreError::Locked
            })?;

            conn.execute(
                "INSERT OR REPLACE INTO local_state (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value, updated_at],
            )
            .map_err(|e| {
                error!("Failed to write key {key}: {e}");
                LocalStoreError::OperationError(format!("Failed to write key: {e}"))
            })?;

            debug!("Stored local key {key}");
            Ok(())
        })
        .await
        .map_err(|e| {
            error!("Task panic while writing key: {e}");
            LocalStoreError::OperationError(format!("Task panic: {e}"))
        })?
    }

    async fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        let connection = Arc::clone(&self.connection);
        let key = key.to_string();

        task::spawn_blocking(move || {
            let conn = connection.lock().map_err(|_| {
                error!("Failed to acquire database lock");
                LocalStoreError::Locked
            })?;

            conn.execute("DELETE FROM local_state WHERE key = ?1", params![key])
                .map_err(|e| {
                    error!("Failed to remove key {key}: {e}");
                    LocalStoreError::OperationError(format!("Failed to remove key: {e}"))
                })?;
            Ok(())
        })
        .await
        .map_err(|e| {
            error!("Task panic while removing key: {e}");
            LocalStoreError::OperationError(format!("Task panic: {e}"))
        })?
    }
}
