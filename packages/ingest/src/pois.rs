//! POI ingestion batcher.
//!
//! Visits unsaturated stops in insertion order, querying the search
//! source once per stop at the largest configured radius and inserting
//! unseen POIs until the batch cap is reached or every stop has been
//! visited. Visitation starts after the persisted cursor and wraps
//! around, so successive invocations spread coverage across all stops
//! instead of starving the later ones.
//!
//! The cursor advances to a stop's id only once that stop's response has
//! been fully processed; an invocation killed mid-stop resumes at the
//! incomplete stop.

use rusqlite::Connection;
use transit_map_database::{meta, pois_db, stops_db};
use transit_map_source::PoiSource;

use crate::IngestError;

/// Runs one POI ingestion invocation and returns the number of POIs
/// inserted (at most `batch_cap`).
///
/// A return value strictly below `batch_cap` means every unsaturated
/// stop was visited, so the driver can stop looping.
///
/// # Errors
///
/// Returns [`IngestError`] if a store operation fails. Source failures
/// are absorbed as empty listings.
#[allow(clippy::future_not_send)]
pub async fn ingest_pois(
    conn: &Connection,
    source: &dyn PoiSource,
    batch_cap: u64,
    search_radius_m: i64,
    saturation: u64,
) -> Result<u64, IngestError> {
    let stops = stops_db::list_all(conn)?;
    if stops.is_empty() {
        log::info!("POI ingestion found no stops to visit");
        return Ok(0);
    }

    let start = meta::poi_cursor(conn)?
        .and_then(|cursor| stops.iter().position(|s| s.id == cursor))
        .map_or(0, |i| (i + 1) % stops.len());

    let mut inserted = 0u64;

    for stop in stops.iter().cycle().skip(start).take(stops.len()) {
        if inserted >= batch_cap {
            break;
        }
        if pois_db::count_for_stop(conn, stop.id)? >= saturation {
            continue;
        }

        let listing = source
            .fetch_nearby(stop.latitude, stop.longitude, search_radius_m)
            .await;

        let mut truncated = false;
        for poi in &listing {
            if inserted >= batch_cap {
                // Cap hit with records left over: this stop stays
                // incomplete and the cursor must not move past it.
                truncated = true;
                break;
            }
            if pois_db::insert(conn, stop.id, poi)? {
                inserted += 1;
            }
        }

        if !truncated {
            meta::set_poi_cursor(conn, stop.id)?;
        }
    }

    meta::mark_ingest_run(conn, meta::POIS_LAST_INGEST_AT)?;
    log::info!("POI ingestion inserted {inserted} new POIs (cap {batch_cap})");
    Ok(inserted)
}
