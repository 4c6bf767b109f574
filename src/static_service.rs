use std::time::Duration;

use anyhow::Context;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::sync::OnceCell;

use crate::config::APP_CONFIG;
use crate::services::error::ServiceError;
use crate::utils::file_store::FileStore;

pub static DATABASE_CONNECTION: OnceCell<DatabaseConnection> = OnceCell::const_new();
pub static FILE_STORE: once_cell::sync::OnceCell<FileStore> = once_cell::sync::OnceCell::new();

/// Opens the pool on first call. Store calls are bounded by the configured
/// connect and acquire timeouts.
pub async fn init_database_connection() -> anyhow::Result<&'static DatabaseConnection> {
    DATABASE_CONNECTION
        .get_or_try_init(|| async {
            let mut options = ConnectOptions::new(APP_CONFIG.database_url.clone());
            options
                .max_connections(APP_CONFIG.db_max_connections)
                .connect_timeout(Duration::from_secs(APP_CONFIG.db_connect_timeout_secs))
                .acquire_timeout(Duration::from_secs(APP_CONFIG.db_acquire_timeout_secs))
                .sqlx_logging(false);

            Database::connect(options)
                .await
                .context("Failed to connect to database")
        })
        .await
}

pub fn init_file_store() -> &'static FileStore {
    FILE_STORE.get_or_init(|| FileStore::new(&APP_CONFIG.media_root))
}

/// Connection handle for request handlers.
pub fn get_database_connection() -> Result<&'static DatabaseConnection, ServiceError> {
    DATABASE_CONNECTION
        .get()
        .ok_or_else(|| ServiceError::unavailable("Database connection is not initialized."))
}

pub fn get_file_store() -> Result<&'static FileStore, ServiceError> {
    FILE_STORE
        .get()
        .ok_or_else(|| ServiceError::unavailable("File store is not initialized."))
}
