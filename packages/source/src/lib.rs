#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP clients for the two external data sources.
//!
//! Both clients absorb transient failures at the call boundary: a failed
//! request, a non-success status, or an unparsable body yields an empty
//! listing (logged at `warn`), never an error. Repeated batcher
//! invocations converge past transient outages without retry logic.

pub mod config;
pub mod parsing;
pub mod pois;
pub mod rate_limit;
pub mod stops;

use async_trait::async_trait;
use transit_map_source_models::{NormalizedPoi, NormalizedStop, StopKind};

/// Errors that can occur while constructing clients or loading
/// configuration. Fetch-time failures are absorbed, not raised.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parsing failed.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration values failed validation.
    #[error("Invalid config: {message}")]
    InvalidConfig {
        /// Description of what went wrong.
        message: String,
    },
}

/// A source of transit stop listings (external source A).
#[async_trait]
pub trait StopSource: Send + Sync {
    /// Fetches the full current listing for one stop kind.
    ///
    /// Transient failures yield an empty listing.
    async fn fetch_stops(&self, kind: StopKind) -> Vec<NormalizedStop>;
}

/// A source of points of interest near a coordinate (external source B).
#[async_trait]
pub trait PoiSource: Send + Sync {
    /// Fetches POIs within `radius_m` meters of the coordinate.
    ///
    /// Transient failures yield an empty listing.
    async fn fetch_nearby(&self, lat: f64, lon: f64, radius_m: i64) -> Vec<NormalizedPoi>;
}
