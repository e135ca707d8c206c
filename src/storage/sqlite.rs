//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.
//! The connection lives behind a single mutex owned by the store, so every
//! operation is serialized with every other one and a bulk insert is visible
//! in full to the next existence check.

use crate::paste::Paste;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Timelike, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SELECT_PASTES: &str = "SELECT id, title, author, date, content FROM pastes";

const INSERT_PASTE: &str = "INSERT INTO pastes (id, title, author, date, content, ingested_at)
                            VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// The parent directory of `path` is created if it does not exist.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn query_pastes<P: rusqlite::Params>(&self, sql: &str, params: P) -> StorageResult<Vec<Paste>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let pastes = stmt
            .query_map(params, paste_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pastes)
    }
}

impl Storage for SqliteStorage {
    fn count_by_id(&self, id: &str) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM pastes WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn insert(&self, paste: &Paste) -> StorageResult<()> {
        let conn = self.lock()?;
        insert_paste(&conn, paste, &format_timestamp(&Utc::now()))
    }

    fn insert_many(&self, pastes: &[Paste]) -> StorageResult<usize> {
        let mut conn = self.lock()?;
        let ingested_at = format_timestamp(&Utc::now());

        let tx = conn.transaction()?;
        for paste in pastes {
            insert_paste(&tx, paste, &ingested_at)?;
        }
        tx.commit()?;

        Ok(pastes.len())
    }

    fn get_all(&self) -> StorageResult<Vec<Paste>> {
        self.query_pastes(&format!("{} ORDER BY date, id", SELECT_PASTES), [])
    }

    fn get_by_id(&self, id: &str) -> StorageResult<Option<Paste>> {
        let conn = self.lock()?;
        let paste = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_PASTES),
                params![id],
                paste_from_row,
            )
            .optional()?;
        Ok(paste)
    }

    fn get_by_author(&self, author: &str) -> StorageResult<Vec<Paste>> {
        self.query_pastes(
            &format!("{} WHERE author = ?1 ORDER BY date, id", SELECT_PASTES),
            params![author],
        )
    }

    fn get_by_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StorageResult<Vec<Paste>> {
        self.query_pastes(
            &format!(
                "{} WHERE date >= ?1 AND date <= ?2 ORDER BY date, id",
                SELECT_PASTES
            ),
            params![format_timestamp(&ceil_to_second(from)), format_timestamp(&to)],
        )
    }

    fn count(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pastes", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn insert_paste(conn: &Connection, paste: &Paste, ingested_at: &str) -> StorageResult<()> {
    let mut stmt = conn.prepare_cached(INSERT_PASTE)?;
    stmt.execute(params![
        paste.id,
        paste.title,
        paste.author,
        format_timestamp(&paste.date),
        paste.content,
        ingested_at,
    ])
    .map_err(|e| {
        if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            StorageError::ConstraintViolation(format!("paste '{}' is already stored", paste.id))
        } else {
            StorageError::Sqlite(e)
        }
    })?;
    Ok(())
}

fn paste_from_row(row: &Row<'_>) -> rusqlite::Result<Paste> {
    let date: String = row.get(3)?;
    let date = parse_timestamp(&date)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Paste {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        date,
        content: row.get(4)?,
    })
}

/// Fixed-width UTC text so that SQL string comparison orders by time
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Stored dates are whole seconds, so a fractional lower bound must round up
/// to stay inclusive; an upper bound truncates correctly on its own.
fn ceil_to_second(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    if timestamp.nanosecond() == 0 {
        timestamp
    } else {
        timestamp.trunc_subsecs(0) + Duration::seconds(1)
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}
