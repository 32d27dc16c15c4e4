//! `SQLite` storage for the deck.
//!
//! [`Database`] owns the connection pool behind [`crate::Deck`]. Opening it
//! creates the file and its directory when missing, then brings the schema
//! up to date from `migrations/`.
//!
//! # Example
//!
//! ```no_run
//! use flashdeck_core::{Database, Deck};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let deck = Deck::new(Database::new(Path::new("flashdeck.db")).await?);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::{debug, instrument};

/// Commands run one at a time against the deck file.
const MAX_FILE_CONNECTIONS: u32 = 2;

/// How long a connection waits on a locked deck before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while opening the deck database.
#[derive(Error, Debug)]
pub enum DbError {
    /// The directory holding the database file could not be created.
    #[error("failed to create database directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to connect to the database.
    #[error("failed to connect to database: {0}")]
    Connection(#[from] sqlx::Error),

    /// The deck schema could not be applied.
    #[error("failed to run migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connection pool over the deck schema.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the deck database at `db_path`, creating the file and its parent
    /// directory when they do not exist yet.
    ///
    /// Every pooled connection runs in WAL mode with a busy timeout.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::CreateDir`] if the directory cannot be created,
    /// [`DbError::Connection`] if the file cannot be opened, or
    /// [`DbError::Migration`] if the schema cannot be applied.
    #[instrument(skip(db_path), fields(path = %db_path.display()))]
    pub async fn new(db_path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_FILE_CONNECTIONS)
            .connect_with(options)
            .await?;

        Self::migrated(pool).await
    }

    /// Creates a throwaway in-memory deck database.
    ///
    /// The pool is capped at one connection because every `SQLite`
    /// in-memory connection would otherwise see its own empty database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connection`] or [`DbError::Migration`].
    #[instrument]
    pub async fn new_in_memory() -> Result<Self, DbError> {
        let options = SqliteConnectOptions::new().in_memory(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::migrated(pool).await
    }

    async fn migrated(pool: SqlitePool) -> Result<Self, DbError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        debug!("Deck schema up to date");
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Reports whether the database file is in WAL mode.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connection`] if the query fails.
    #[instrument(skip(self))]
    pub async fn is_wal_enabled(&self) -> Result<bool, DbError> {
        let (mode,): (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&self.pool)
            .await?;
        Ok(mode.eq_ignore_ascii_case("wal"))
    }

    /// Closes the pool, flushing the WAL back into the database file.
    #[instrument(skip(self))]
    pub async fn close(self) {
        self.pool.close().await;
    }
}
