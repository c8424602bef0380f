#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate rankings over the stop and POI stores.
//!
//! For each configured distance threshold and stop kind, stops are
//! joined to their POI counts (POIs beyond the threshold excluded),
//! duplicate display names are collapsed to the maximum count, and the
//! top and bottom five are extracted. Purely a read-side view; nothing
//! here writes to the store.

pub mod report;

use std::collections::HashMap;

use rusqlite::Connection;
use transit_map_database::{DbError, pois_db};
use transit_map_source_models::StopKind;

/// Entries kept on each end of a ranking.
pub const RANK_SIZE: usize = 5;

/// Errors that can occur during aggregation or report writing.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Store operation failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Report file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A stop name with its POI count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopPoiCount {
    /// Stop display name (unique within a ranking after dedup).
    pub name: String,
    /// POIs within the ranking's threshold.
    pub count: u64,
}

/// Rankings for one stop kind at one threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindRanking {
    /// The stop kind.
    pub kind: StopKind,
    /// Up to [`RANK_SIZE`] stops with the most POIs, descending. Ties
    /// order by reverse first-seen insertion order.
    pub most: Vec<StopPoiCount>,
    /// Up to [`RANK_SIZE`] stops with the fewest POIs, ascending. Ties
    /// order by first-seen insertion order.
    pub least: Vec<StopPoiCount>,
}

/// All per-kind rankings at one distance threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdReport {
    /// The walking-distance threshold in meters.
    pub threshold_m: i64,
    /// One ranking per stop kind, in the fixed kind order.
    pub rankings: Vec<KindRanking>,
}

/// Builds the full report: one [`ThresholdReport`] per configured
/// threshold, each covering every stop kind.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if a store query fails.
pub fn aggregate(conn: &Connection, radii_m: &[i64]) -> Result<Vec<ThresholdReport>, AnalyticsError> {
    radii_m
        .iter()
        .map(|&threshold_m| {
            let joined = pois_db::list_joined(conn, threshold_m)?;

            let rankings = StopKind::ALL
                .iter()
                .map(|&kind| {
                    let entries: Vec<(String, u64)> = joined
                        .iter()
                        .filter(|row| row.kind == kind)
                        .map(|row| (row.name.clone(), row.poi_count))
                        .collect();
                    let (most, least) = rank(entries);
                    KindRanking { kind, most, least }
                })
                .collect();

            log::info!("Aggregated rankings at {threshold_m}m");
            Ok(ThresholdReport {
                threshold_m,
                rankings,
            })
        })
        .collect()
}

/// Collapses duplicate names to the maximum count, sorts ascending with
/// a stable sort (ties keep first-seen order), and takes both ends.
fn rank(entries: Vec<(String, u64)>) -> (Vec<StopPoiCount>, Vec<StopPoiCount>) {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<StopPoiCount> = Vec::new();

    for (name, count) in entries {
        if let Some(&i) = positions.get(&name) {
            if count > unique[i].count {
                unique[i].count = count;
            }
        } else {
            positions.insert(name.clone(), unique.len());
            unique.push(StopPoiCount { name, count });
        }
    }

    unique.sort_by_key(|entry| entry.count);

    let least = unique.iter().take(RANK_SIZE).cloned().collect();
    let most = unique.iter().rev().take(RANK_SIZE).cloned().collect();
    (most, least)
}
