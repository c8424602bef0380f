#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! SQLite store for the transit map pipeline.
//!
//! The two data tables, `stops` and `pois`, each carry a UNIQUE
//! constraint on their natural key, so ingestion inserts with
//! `INSERT OR IGNORE` and duplicates are silent no-ops. A `meta` key/value table tracks the
//! POI ingestion cursor and last-run timestamps. Connections are opened,
//! used, and dropped per batcher invocation; every insert commits
//! independently, which keeps an interrupted run resumable.

pub mod db;
pub mod meta;
pub mod pois_db;
pub mod stops_db;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// SQLite operation failed.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error creating the store's parent directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data failed conversion to its in-memory type.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
