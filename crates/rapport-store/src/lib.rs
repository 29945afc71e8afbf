//! Rapport Storage Layer
//!
//! Implements the `FriendStore` trait on SQLite.
//!
//! # Architecture
//!
//! - One `friends` table with an auto-incrementing `id`
//! - One connection per session, closed when the session is dropped
//! - Each batch is written with a single multi-row `INSERT ... VALUES`
//!   statement, so SQLite's statement-level atomicity covers the batch
//!
//! # Examples
//!
//! ```no_run
//! use rapport_store::SqliteStore;
//!
//! let store = SqliteStore::open("friends.db").unwrap();
//! // Store is now ready for batch inserts
//! ```

#![warn(missing_docs)]

use chrono::NaiveDate;
use rapport_domain::traits::{FriendStore, StoreSession};
use rapport_domain::{FriendRow, InsertOutcome, StoredFriend, FRIEND_COLUMNS};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row, ToSql};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Bound-parameter ceiling of the bundled SQLite build
pub const MAX_BOUND_PARAMETERS: usize = 32_766;

/// Largest batch that fits in one insert statement
pub const MAX_BATCH_ROWS: usize = MAX_BOUND_PARAMETERS / FRIEND_COLUMNS.len();

/// Default time a session waits on a locked database
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Batch does not fit in a single statement
    #[error("Batch too large: {0} rows (max: {1})")]
    BatchTooLarge(usize, usize),

    /// The statement wrote fewer rows than it was given; nothing was kept
    #[error("Insert rolled back: {inserted} of {expected} rows written")]
    RowCountMismatch {
        /// Rows in the batch
        expected: usize,
        /// Rows the statement reported
        inserted: usize,
    },
}

/// SQLite-backed store for the `friends` table
///
/// Holds only the database location; every session opens its own
/// connection, so concurrent pipeline runs never share one.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteStore {
    /// Open the store at `path`, creating the `friends` table if missing
    ///
    /// In-memory databases are rejected: each session opens a fresh
    /// connection and would see an empty database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if path.as_os_str() == ":memory:" {
            return Err(StoreError::InvalidData(
                "in-memory databases cannot be shared across sessions".to_string(),
            ));
        }

        let store = Self {
            path,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Set how long a session waits on a locked database
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    /// Read one row back by id
    pub fn get_friend(&self, id: i64) -> Result<Option<StoredFriend>, StoreError> {
        let conn = self.connect()?;
        let friend = conn
            .query_row(
                "SELECT id, name, gender, birth_date, company, title, phone, wechat
                 FROM friends WHERE id = ?1",
                [id],
                row_to_friend,
            )
            .optional()?;
        Ok(friend)
    }

    /// Read rows back by id, in ascending id order
    ///
    /// Ids with no row are skipped.
    pub fn list_friends(&self, ids: &[i64]) -> Result<Vec<StoredFriend>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if ids.len() > MAX_BOUND_PARAMETERS {
            return Err(StoreError::BatchTooLarge(ids.len(), MAX_BOUND_PARAMETERS));
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, name, gender, birth_date, company, title, phone, wechat
             FROM friends WHERE id IN ({}) ORDER BY id",
            placeholders
        );

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let friends = stmt
            .query_map(params_from_iter(ids.iter()), row_to_friend)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(friends)
    }

    /// Total number of rows in the table
    pub fn count_friends(&self) -> Result<u64, StoreError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM friends", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl FriendStore for SqliteStore {
    type Error = StoreError;
    type Session = SqliteSession;

    fn open_session(&self) -> Result<Self::Session, Self::Error> {
        debug!("Opening storage session on {}", self.path.display());
        Ok(SqliteSession {
            conn: self.connect()?,
        })
    }
}

/// A storage session: one SQLite connection, closed on drop
pub struct SqliteSession {
    conn: Connection,
}

impl StoreSession for SqliteSession {
    type Error = StoreError;

    fn insert_friends(&mut self, rows: &[FriendRow]) -> Result<InsertOutcome, Self::Error> {
        if rows.is_empty() {
            return Err(StoreError::InvalidData(
                "cannot insert an empty batch".to_string(),
            ));
        }
        if rows.len() > MAX_BATCH_ROWS {
            return Err(StoreError::BatchTooLarge(rows.len(), MAX_BATCH_ROWS));
        }

        let sql = insert_statement(rows.len());
        let mut params: Vec<&dyn ToSql> = Vec::with_capacity(rows.len() * FRIEND_COLUMNS.len());
        for row in rows {
            params.push(&row.name);
            params.push(&row.gender);
            params.push(&row.birth_date);
            params.push(&row.company);
            params.push(&row.title);
            params.push(&row.phone);
            params.push(&row.wechat);
        }

        // Dropping the transaction without commit rolls it back
        let tx = self.conn.transaction()?;
        let affected_rows = tx.execute(&sql, params.as_slice())?;
        if affected_rows != rows.len() {
            return Err(StoreError::RowCountMismatch {
                expected: rows.len(),
                inserted: affected_rows,
            });
        }

        // SQLite reports the rowid of the last row a multi-row insert wrote
        let last_id = tx.last_insert_rowid();
        tx.commit()?;
        let first_id = last_id - affected_rows as i64 + 1;

        debug!(
            "Inserted {} rows, ids {}..={}",
            affected_rows, first_id, last_id
        );

        Ok(InsertOutcome {
            affected_rows: affected_rows as u64,
            first_id,
        })
    }
}

/// Build `INSERT INTO friends (...) VALUES (?, ...), (?, ...)` for `rows` rows
fn insert_statement(rows: usize) -> String {
    let row_placeholder = format!("({})", vec!["?"; FRIEND_COLUMNS.len()].join(", "));
    format!(
        "INSERT INTO friends ({}) VALUES {}",
        FRIEND_COLUMNS.join(", "),
        vec![row_placeholder; rows].join(", ")
    )
}

fn row_to_friend(row: &Row<'_>) -> rusqlite::Result<StoredFriend> {
    let birth_date: NaiveDate = row.get(3)?;
    Ok(StoredFriend {
        id: row.get(0)?,
        row: FriendRow {
            name: row.get(1)?,
            gender: row.get(2)?,
            birth_date,
            company: row.get(4)?,
            title: row.get(5)?,
            phone: row.get(6)?,
            wechat: row.get(7)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_statement_single_row() {
        assert_eq!(
            insert_statement(1),
            "INSERT INTO friends (name, gender, birth_date, company, title, phone, wechat) \
             VALUES (?, ?, ?, ?, ?, ?, ?)"
        );
    }

    #[test]
    fn test_insert_statement_has_one_group_per_row() {
        let sql = insert_statement(3);
        assert_eq!(sql.matches("(?, ?, ?, ?, ?, ?, ?)").count(), 3);
        assert_eq!(sql.matches('?').count(), 21);
        assert_eq!(sql.matches("INSERT").count(), 1);
    }

    #[test]
    fn test_max_batch_rows_fits_parameter_ceiling() {
        assert!(MAX_BATCH_ROWS * FRIEND_COLUMNS.len() <= MAX_BOUND_PARAMETERS);
        assert!((MAX_BATCH_ROWS + 1) * FRIEND_COLUMNS.len() > MAX_BOUND_PARAMETERS);
    }

    #[test]
    fn test_memory_database_rejected() {
        let result = SqliteStore::open(":memory:");
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }
}
