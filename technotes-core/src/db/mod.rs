//! SQLite-backed document store for notes and users.
//!
//! A [`Database`] is a cheap, cloneable handle to a single connection. Record
//! operations are split per collection and return [`StoreResult`] so
//! constraint violations stay distinguishable from connection failures.

mod notes;
mod schema;
mod users;

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use directories::ProjectDirs;
use rusqlite::{ffi, Connection, ErrorCode};

pub use schema::SCHEMA;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("duplicate value for unique field: {0}")]
    Duplicate(String),
    /// Any other constraint (NOT NULL, CHECK) rejected the write.
    #[error("record rejected by the store: {0}")]
    Rejected(String),
    #[error("database connection lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, message) = &err {
            if code.code == ErrorCode::ConstraintViolation {
                let detail = message.clone().unwrap_or_else(|| code.to_string());
                return match code.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        Self::Duplicate(detail)
                    }
                    _ => Self::Rejected(detail),
                };
            }
        }
        Self::Sqlite(err)
    }
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("opening database at {}", path.display()))?;
        tracing::debug!("Opened database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Opens the database in the platform data directory.
    pub fn open_default() -> anyhow::Result<Self> {
        Self::open(default_path()?)
    }

    pub fn open_memory() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Creates any missing tables and indexes. Safe to run on every start.
    pub fn migrate(&self) -> anyhow::Result<()> {
        self.with_connection(|conn| conn.execute_batch(SCHEMA))
            .context("applying schema")?;
        tracing::debug!("Database schema up to date");
        Ok(())
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with_connection<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&conn).map_err(StoreError::from)
    }
}

/// `<data dir>/technotes.db`, e.g. `~/.local/share/technotes/technotes.db`.
pub fn default_path() -> anyhow::Result<std::path::PathBuf> {
    let dirs = ProjectDirs::from("", "", "technotes")
        .context("could not determine a data directory for technotes")?;
    Ok(dirs.data_dir().join("technotes.db"))
}

/// Folds a unique field to the form its index compares on. Lowercasing
/// alone leaves `ß` apart from `SS`, so it is expanded as well.
pub(crate) fn fold_key(value: &str) -> String {
    value.to_lowercase().replace('ß', "ss")
}
