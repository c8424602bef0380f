//! Stop-listing API client (external source A).
//!
//! One GET per stop kind returns the full current listing for that kind
//! around the configured city center. The endpoint is not paginated;
//! callers re-fetch the whole listing on every invocation and rely on
//! store-side dedup.

use async_trait::async_trait;
use serde::Deserialize;
use transit_map_source_models::{NormalizedStop, StopKind, StopSourceConfig};

use crate::parsing::{coord_f64, id_string};
use crate::{SourceError, StopSource};

/// Raw record from the locations API response.
#[derive(Debug, Deserialize)]
struct StopRecord {
    #[serde(default)]
    location_id: Option<serde_json::Value>,
    #[serde(default)]
    location_name: Option<String>,
    #[serde(default)]
    location_lat: Option<serde_json::Value>,
    #[serde(default)]
    location_lon: Option<serde_json::Value>,
}

/// Client for the stop-listing API.
pub struct StopLocationsClient {
    client: reqwest::Client,
    config: StopSourceConfig,
}

impl StopLocationsClient {
    /// Creates a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: StopSourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl StopSource for StopLocationsClient {
    async fn fetch_stops(&self, kind: StopKind) -> Vec<NormalizedStop> {
        let params = [
            ("type", kind.as_ref().to_string()),
            ("lat", self.config.center_lat.to_string()),
            ("lon", self.config.center_lon.to_string()),
            ("radius", self.config.radius_miles.to_string()),
        ];

        let response = match self
            .client
            .get(&self.config.endpoint)
            .query(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Stop listing request for {kind} failed: {e}");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            log::warn!(
                "Stop listing for {kind} returned HTTP {}; treating as empty",
                response.status()
            );
            return Vec::new();
        }

        let records: Vec<StopRecord> = match response.json().await {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Stop listing for {kind} was unparsable: {e}; treating as empty");
                return Vec::new();
            }
        };

        let raw_count = records.len();
        let stops: Vec<NormalizedStop> = records.into_iter().filter_map(normalize_stop).collect();
        log::info!("Fetched {} {kind} records ({raw_count} raw)", stops.len());
        stops
    }
}

/// Maps a raw listing record to a [`NormalizedStop`], dropping records
/// without a usable id or coordinates.
fn normalize_stop(record: StopRecord) -> Option<NormalizedStop> {
    let external_id = id_string(record.location_id.as_ref())?;
    let latitude = coord_f64(record.location_lat.as_ref())?;
    let longitude = coord_f64(record.location_lon.as_ref())?;

    Some(NormalizedStop {
        external_id,
        name: record.location_name.unwrap_or_default(),
        latitude,
        longitude,
    })
}
