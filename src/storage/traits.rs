//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::paste::Paste;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Storage lock poisoned by a panicked caller")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for paste store implementations
///
/// The store is shared by every worker of a crawl cycle, so all methods take
/// `&self` and implementations serialize access internally. The store is
/// append-only: records are never updated or deleted, and inserting an id
/// that is already present is an error rather than a silent dedup.
pub trait Storage: Send + Sync {
    /// Returns true iff a paste with this id is stored
    fn exists_by_id(&self, id: &str) -> StorageResult<bool> {
        Ok(self.count_by_id(id)? > 0)
    }

    /// Counts stored pastes with this id (0 or 1)
    fn count_by_id(&self, id: &str) -> StorageResult<u64>;

    /// Inserts a single paste
    fn insert(&self, paste: &Paste) -> StorageResult<()>;

    /// Inserts all pastes atomically; on error nothing is stored
    ///
    /// # Returns
    ///
    /// The number of pastes inserted
    fn insert_many(&self, pastes: &[Paste]) -> StorageResult<usize>;

    /// Gets every stored paste, oldest first
    fn get_all(&self) -> StorageResult<Vec<Paste>>;

    /// Gets a paste by id
    fn get_by_id(&self, id: &str) -> StorageResult<Option<Paste>>;

    /// Gets all pastes by an exact (normalized) author name
    fn get_by_author(&self, author: &str) -> StorageResult<Vec<Paste>>;

    /// Gets pastes dated within `[from, to]`, both bounds inclusive
    fn get_by_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StorageResult<Vec<Paste>>;

    /// Gets the total paste count
    fn count(&self) -> StorageResult<u64>;
}

/// Trait for raw content persistence
pub trait BlobStore: Send + Sync {
    /// Writes `text` under `id`, replacing any previous content
    ///
    /// # Returns
    ///
    /// The location the blob was written to
    fn write_blob(&self, id: &str, text: &str) -> StorageResult<PathBuf>;
}
