//! POI-search API client (external source B).
//!
//! Every query passes through the injected [`RateLimiter`] before it is
//! sent; the source enforces a process-wide request rate and replies
//! with at most `result_cap` records per query.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use transit_map_source_models::{NormalizedPoi, PoiSourceConfig, UNKNOWN_CATEGORY, UNKNOWN_NAME};

use crate::parsing::distance_i64;
use crate::rate_limit::RateLimiter;
use crate::{PoiSource, SourceError};

/// Raw record from the nearby-search API response.
#[derive(Debug, Deserialize)]
struct PoiRecord {
    #[serde(default)]
    distance: Option<serde_json::Value>,
    #[serde(default, rename = "class")]
    category: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Client for the nearby-search API.
pub struct PoiSearchClient {
    client: reqwest::Client,
    config: PoiSourceConfig,
    limiter: Arc<dyn RateLimiter>,
}

impl PoiSearchClient {
    /// Creates a client that gates every request on `limiter`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: PoiSourceConfig, limiter: Arc<dyn RateLimiter>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            config,
            limiter,
        })
    }
}

#[async_trait]
impl PoiSource for PoiSearchClient {
    async fn fetch_nearby(&self, lat: f64, lon: f64, radius_m: i64) -> Vec<NormalizedPoi> {
        self.limiter.acquire().await;

        let params = [
            ("key", self.config.api_key.clone()),
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("tag", self.config.tag.clone()),
            ("radius", radius_m.to_string()),
            ("limit", self.config.result_cap.to_string()),
            ("format", "json".to_string()),
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
                log::warn!("POI search at ({lat}, {lon}) failed: {e}");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            log::warn!(
                "POI search at ({lat}, {lon}) returned HTTP {}; treating as empty",
                response.status()
            );
            return Vec::new();
        }

        let records: Vec<PoiRecord> = match response.json().await {
            Ok(records) => records,
            Err(e) => {
                log::warn!("POI search response was unparsable: {e}; treating as empty");
                return Vec::new();
            }
        };

        records.into_iter().filter_map(normalize_poi).collect()
    }
}

/// Maps a raw search record to a [`NormalizedPoi`], dropping records
/// without a usable distance. Missing labels get sentinel values so the
/// natural key stays total.
fn normalize_poi(record: PoiRecord) -> Option<NormalizedPoi> {
    let distance_m = distance_i64(record.distance.as_ref())?;

    Some(NormalizedPoi {
        distance_m,
        category: record
            .category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        name: record
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> PoiRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn normalizes_full_record() {
        let poi = normalize_poi(record(json!({
            "distance": 120,
            "class": "atm",
            "name": "PNC Bank",
        })))
        .unwrap();

        assert_eq!(poi.distance_m, 120);
        assert_eq!(poi.category, "atm");
        assert_eq!(poi.name, "PNC Bank");
    }

    #[test]
    fn missing_labels_get_sentinels() {
        let poi = normalize_poi(record(json!({ "distance": "88" }))).unwrap();
        assert_eq!(poi.category, UNKNOWN_CATEGORY);
        assert_eq!(poi.name, UNKNOWN_NAME);
    }

    #[test]
    fn empty_labels_get_sentinels() {
        let poi = normalize_poi(record(json!({
            "distance": 5,
            "class": "",
            "name": "",
        })))
        .unwrap();
        assert_eq!(poi.category, UNKNOWN_CATEGORY);
        assert_eq!(poi.name, UNKNOWN_NAME);
    }

    #[test]
    fn drops_record_without_distance() {
        assert!(normalize_poi(record(json!({ "name": "No Distance" }))).is_none());
    }
}
