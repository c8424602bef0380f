#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Batched, resumable ingestion.
//!
//! Each batcher is invoked repeatedly by the driver; a single invocation
//! inserts at most `batch_cap` new rows and leaves the store in a state
//! any later invocation can pick up from. Source failures surface as
//! empty listings, so a bad round simply inserts nothing and the next
//! round tries again.

pub mod pois;
pub mod stops;

pub use pois::ingest_pois;
pub use stops::ingest_stops;

use transit_map_database::DbError;

/// Errors that can occur during an ingestion invocation.
///
/// Source failures are absorbed upstream; only store failures are fatal.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Store operation failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}
