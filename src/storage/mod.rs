//! Storage module for persisting crawled pastes
//!
//! This module handles:
//! - SQLite database initialization and schema management
//! - The append-only paste store and its queries
//! - Writing raw paste content to disk

mod blob;
mod schema;
mod sqlite;
mod traits;

pub use blob::FsBlobStore;
pub use sqlite::SqliteStorage;
pub use traits::{BlobStore, Storage, StorageError, StorageResult};

use std::path::Path;

/// Initializes or opens a paste store
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    tracing::info!("Opening paste store at {}", path.display());
    SqliteStorage::new(path)
}
