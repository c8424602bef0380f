//! POI table access.
//!
//! `(stop_id, distance_m, category, name)` is the natural key, enforced
//! by a UNIQUE constraint; rows are created once and never updated or
//! deleted. A stop holding `result_cap` (50) POIs has everything a
//! single query can return and is skipped by further ingestion.

use rusqlite::{Connection, params};
use transit_map_source_models::{NormalizedPoi, StopKind};

use crate::DbError;

/// One row of the stop/POI-count join produced by [`list_joined`].
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedStopCount {
    /// Category of the stop.
    pub kind: StopKind,
    /// Display name of the stop.
    pub name: String,
    /// POIs stored for the stop within the queried threshold.
    pub poi_count: u64,
}

/// Returns whether a POI with this natural key is stored.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn exists(
    conn: &Connection,
    stop_id: i64,
    distance_m: i64,
    category: &str,
    name: &str,
) -> Result<bool, DbError> {
    let mut stmt = conn.prepare(
        "SELECT 1 FROM pois WHERE stop_id = ? AND distance_m = ? AND category = ? AND name = ?",
    )?;
    let found = stmt.exists(params![stop_id, distance_m, category, name])?;
    Ok(found)
}

/// Inserts a POI unless its natural key is already present.
///
/// Returns whether a row was added; a duplicate is a silent no-op.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub fn insert(conn: &Connection, stop_id: i64, poi: &NormalizedPoi) -> Result<bool, DbError> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO pois (stop_id, distance_m, category, name)
         VALUES (?, ?, ?, ?)",
        params![stop_id, poi.distance_m, poi.category, poi.name],
    )?;
    Ok(changed == 1)
}

/// Returns the number of POIs stored for one stop.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn count_for_stop(conn: &Connection, stop_id: i64) -> Result<u64, DbError> {
    let mut stmt = conn.prepare("SELECT COUNT(*) FROM pois WHERE stop_id = ?")?;
    let count: i64 = stmt.query_row([stop_id], |row| row.get(0))?;
    #[allow(clippy::cast_sign_loss)]
    Ok(count as u64)
}

/// Returns the total number of stored POIs.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn total(conn: &Connection) -> Result<u64, DbError> {
    let mut stmt = conn.prepare("SELECT COUNT(*) FROM pois")?;
    let count: i64 = stmt.query_row([], |row| row.get(0))?;
    #[allow(clippy::cast_sign_loss)]
    Ok(count as u64)
}

/// Returns the number of stops that have reached `saturation` POIs.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn saturated_count(conn: &Connection, saturation: u64) -> Result<u64, DbError> {
    let mut stmt = conn.prepare(
        "SELECT COUNT(*) FROM (
            SELECT stop_id FROM pois GROUP BY stop_id HAVING COUNT(*) >= ?
        )",
    )?;
    #[allow(clippy::cast_possible_wrap)]
    let count: i64 = stmt.query_row([saturation as i64], |row| row.get(0))?;
    #[allow(clippy::cast_sign_loss)]
    Ok(count as u64)
}

/// Joins every stop to its POI count within `threshold_m`, in stop
/// insertion order. Stops with no qualifying POI count as zero.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored kind is unknown.
pub fn list_joined(conn: &Connection, threshold_m: i64) -> Result<Vec<JoinedStopCount>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT s.kind, s.name, COUNT(p.id)
         FROM stops s
         LEFT JOIN pois p ON p.stop_id = s.id AND p.distance_m <= ?
         GROUP BY s.id
         ORDER BY s.id",
    )?;

    let raw: Vec<(String, String, i64)> = stmt
        .query_map([threshold_m], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<Result<_, _>>()?;

    raw.into_iter()
        .map(|(kind, name, poi_count)| {
            let kind = kind.parse::<StopKind>().map_err(|e| DbError::Conversion {
                message: format!("unknown stop kind {kind:?}: {e}"),
            })?;
            #[allow(clippy::cast_sign_loss)]
            Ok(JoinedStopCount {
                kind,
                name,
                poi_count: poi_count as u64,
            })
        })
        .collect()
}
