#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record and configuration types shared by the transit map pipeline.
//!
//! The stop-listing client produces [`NormalizedStop`] records and the
//! POI-search client produces [`NormalizedPoi`] records. Every component
//! receives its settings through [`AppConfig`], which deserializes from a
//! TOML file with defaults for every field.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Category label stored for a POI whose source record omits one.
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";

/// Name stored for a POI whose source record omits one.
pub const UNKNOWN_NAME: &str = "Unknown Name";

/// The fixed set of stop categories served by the stop-listing API.
///
/// The string form of each variant is the listing type the API expects
/// and the value stored in the `stops.kind` column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StopKind {
    /// Surface bus stops (`bus_stops`).
    BusStops,
    /// Trolley stops (`trolley_stops`).
    TrolleyStops,
    /// Regional rail stations (`rail_stations`).
    RailStations,
}

impl StopKind {
    /// All kinds, in the fixed rotation order used by stop ingestion.
    pub const ALL: [Self; 3] = [Self::BusStops, Self::TrolleyStops, Self::RailStations];
}

/// A transit stop normalized from a stop-listing API record.
///
/// `(kind, external_id)` is the natural key; records that survive
/// normalization always carry usable coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStop {
    /// Source-assigned stop identifier.
    pub external_id: String,
    /// Display name (e.g., "15th St Station"). Empty when the source
    /// record omits one.
    pub name: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

/// A point of interest normalized from a POI-search API record.
///
/// Together with the owning stop's surrogate id, `(distance_m, category,
/// name)` completes the natural key used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPoi {
    /// Distance from the queried stop, in meters.
    pub distance_m: i64,
    /// Source category label, or [`UNKNOWN_CATEGORY`].
    pub category: String,
    /// Display name, or [`UNKNOWN_NAME`].
    pub name: String,
}

/// Settings for the stop-listing source (external source A).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopSourceConfig {
    /// Locations API endpoint.
    pub endpoint: String,
    /// Latitude of the city center the listing is anchored on.
    pub center_lat: f64,
    /// Longitude of the city center.
    pub center_lon: f64,
    /// Listing search radius around the center, in miles.
    pub radius_miles: u32,
}

impl Default for StopSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www3.septa.org/hackathon/locations/get_locations.php".to_string(),
            center_lat: 39.9526,
            center_lon: -75.1652,
            radius_miles: 100,
        }
    }
}

/// Settings for the POI-search source (external source B).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoiSourceConfig {
    /// Nearby-search API endpoint.
    pub endpoint: String,
    /// Static API key. Empty by default; the CLI overrides it from the
    /// `TRANSIT_MAP_POI_API_KEY` environment variable when set.
    pub api_key: String,
    /// Topic filter passed on every query (e.g., `atm`).
    pub tag: String,
    /// Per-query result cap enforced by the source. A stop holding this
    /// many POIs is saturated and skipped by ingestion.
    pub result_cap: u64,
    /// Fixed delay before every query, in milliseconds, keeping the
    /// process under the source's rate limit.
    pub rate_limit_ms: u64,
}

impl Default for PoiSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://us1.locationiq.com/v1/nearby.php".to_string(),
            api_key: String::new(),
            tag: "atm".to_string(),
            result_cap: 50,
            rate_limit_ms: 1100,
        }
    }
}

/// Top-level configuration for the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the SQLite store.
    pub db_path: String,
    /// Path the text report is written to.
    pub report_path: String,
    /// Maximum number of new rows a single batcher invocation may insert.
    pub batch_cap: u64,
    /// Walking-distance thresholds in meters, ascending. The largest is
    /// also the radius used for POI queries.
    pub radii_m: Vec<i64>,
    /// Stop batcher invocations performed by the `run` command.
    pub stop_runs: u32,
    /// Maximum POI batcher invocations performed by the `run` command.
    pub poi_runs: u32,
    /// Stop-listing source settings.
    pub stops: StopSourceConfig,
    /// POI-search source settings.
    pub pois: PoiSourceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "transit_data.sqlite3".to_string(),
            report_path: "atm_report.txt".to_string(),
            batch_cap: 25,
            // ~5/10/15 minutes at average walking speed.
            radii_m: vec![416, 833, 1250],
            stop_runs: 6,
            poi_runs: 24,
            stops: StopSourceConfig::default(),
            pois: PoiSourceConfig::default(),
        }
    }
}

impl AppConfig {
    /// The largest configured walking-distance threshold, which is also
    /// the radius POI queries are issued at.
    ///
    /// # Panics
    ///
    /// Panics if `radii_m` is empty, which the config loader rejects.
    #[must_use]
    pub fn search_radius_m(&self) -> i64 {
        self.radii_m
            .iter()
            .copied()
            .max()
            .expect("radii_m is never empty")
    }
}
