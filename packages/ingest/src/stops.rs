//! Stop ingestion batcher.
//!
//! Fetches the full listing for every stop kind (one call each), then
//! inserts new stops in round-robin order across kinds until the batch
//! cap is reached or every listing is exhausted. Already-known stops are
//! discarded without counting toward the cap; a kind whose listing runs
//! out drops from the rotation. Each invocation re-fetches the listings,
//! so repeated invocations converge on full coverage.

use std::collections::VecDeque;

use rusqlite::Connection;
use transit_map_database::{meta, stops_db};
use transit_map_source::StopSource;
use transit_map_source_models::{NormalizedStop, StopKind};

use crate::IngestError;

/// Runs one stop ingestion invocation and returns the number of stops
/// inserted (at most `batch_cap`).
///
/// # Errors
///
/// Returns [`IngestError`] if a store operation fails. Source failures
/// are absorbed as empty listings.
#[allow(clippy::future_not_send)]
pub async fn ingest_stops(
    conn: &Connection,
    source: &dyn StopSource,
    batch_cap: u64,
) -> Result<u64, IngestError> {
    let mut listings: Vec<(StopKind, VecDeque<NormalizedStop>)> = Vec::new();
    for kind in StopKind::ALL {
        let stops = source.fetch_stops(kind).await;
        if stops.is_empty() {
            // Failed or empty fetch: the kind starts out exhausted.
            continue;
        }
        listings.push((kind, stops.into()));
    }

    let mut inserted = 0u64;
    let mut turn = 0usize;

    while inserted < batch_cap && !listings.is_empty() {
        if turn >= listings.len() {
            turn = 0;
        }

        let (kind, queue) = &mut listings[turn];
        while let Some(candidate) = queue.pop_front() {
            if stops_db::insert_if_absent(conn, *kind, &candidate)? {
                inserted += 1;
                break;
            }
        }

        if listings[turn].1.is_empty() {
            // Exhausted: drop from the rotation; `turn` now points at
            // the next kind.
            listings.remove(turn);
        } else {
            turn += 1;
        }
    }

    meta::mark_ingest_run(conn, meta::STOPS_LAST_INGEST_AT)?;
    log::info!("Stop ingestion inserted {inserted} new stops (cap {batch_cap})");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use transit_map_database::db::open_in_memory;

    use super::*;

    /// Serves canned listings and counts fetches per kind.
    struct FakeStopSource {
        listings: HashMap<StopKind, Vec<NormalizedStop>>,
        fetches: Mutex<u64>,
    }

    impl FakeStopSource {
        fn new(listings: HashMap<StopKind, Vec<NormalizedStop>>) -> Self {
            Self {
                listings,
                fetches: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl StopSource for FakeStopSource {
        async fn fetch_stops(&self, kind: StopKind) -> Vec<NormalizedStop> {
            *self.fetches.lock().unwrap() += 1;
            self.listings.get(&kind).cloned().unwrap_or_default()
        }
    }

    fn stops(kind_tag: &str, count: usize) -> Vec<NormalizedStop> {
        (0..count)
            .map(|i| NormalizedStop {
                external_id: format!("{kind_tag}-{i}"),
                name: format!("{kind_tag} stop {i}"),
                latitude: 39.95,
                longitude: -75.16,
            })
            .collect()
    }

    fn source_with(
        bus: usize,
        trolley: usize,
        rail: usize,
    ) -> FakeStopSource {
        FakeStopSource::new(HashMap::from([
            (StopKind::BusStops, stops("bus", bus)),
            (StopKind::TrolleyStops, stops("trolley", trolley)),
            (StopKind::RailStations, stops("rail", rail)),
        ]))
    }

    #[tokio::test]
    async fn repeated_invocations_insert_each_natural_key_once() {
        let conn = open_in_memory().unwrap();
        let source = source_with(4, 4, 4);

        let first = ingest_stops(&conn, &source, 100).await.unwrap();
        let second = ingest_stops(&conn, &source, 100).await.unwrap();

        assert_eq!(first, 12);
        assert_eq!(second, 0);
        assert_eq!(stops_db::total(&conn).unwrap(), 12);
    }

    #[tokio::test]
    async fn never_inserts_more_than_the_cap() {
        let conn = open_in_memory().unwrap();
        let source = source_with(20, 20, 20);

        let inserted = ingest_stops(&conn, &source, 7).await.unwrap();

        assert_eq!(inserted, 7);
        assert_eq!(stops_db::total(&conn).unwrap(), 7);
    }

    #[tokio::test]
    async fn round_robin_drops_exhausted_kind_and_keeps_alternating() {
        let conn = open_in_memory().unwrap();
        let source = source_with(10, 1, 10);

        let inserted = ingest_stops(&conn, &source, 6).await.unwrap();
        assert_eq!(inserted, 6);

        // Rotation bus, trolley, rail, bus, rail, bus: the single-entry
        // kind is drawn exactly once and dropped, the others alternate.
        assert_eq!(stops_db::count_for(&conn, StopKind::BusStops).unwrap(), 3);
        assert_eq!(
            stops_db::count_for(&conn, StopKind::TrolleyStops).unwrap(),
            1
        );
        assert_eq!(
            stops_db::count_for(&conn, StopKind::RailStations).unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn known_stops_are_skipped_without_consuming_the_cap() {
        let conn = open_in_memory().unwrap();

        // Pre-seed the first three bus stops.
        for stop in stops("bus", 3) {
            stops_db::insert_if_absent(&conn, StopKind::BusStops, &stop).unwrap();
        }

        let source = FakeStopSource::new(HashMap::from([(StopKind::BusStops, stops("bus", 5))]));
        let inserted = ingest_stops(&conn, &source, 2).await.unwrap();

        // The three known candidates are discarded and the two fresh
        // ones still fit in the cap.
        assert_eq!(inserted, 2);
        assert_eq!(stops_db::count_for(&conn, StopKind::BusStops).unwrap(), 5);
    }

    #[tokio::test]
    async fn failed_kind_is_treated_as_exhausted() {
        let conn = open_in_memory().unwrap();
        let source = FakeStopSource::new(HashMap::from([
            (StopKind::BusStops, stops("bus", 2)),
            // Trolley and rail listings missing: fetch yields empty.
        ]));

        let inserted = ingest_stops(&conn, &source, 10).await.unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(*source.fetches.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn invocation_records_a_run_timestamp() {
        let conn = open_in_memory().unwrap();
        let source = source_with(1, 0, 0);

        ingest_stops(&conn, &source, 5).await.unwrap();

        assert!(
            meta::get(&conn, meta::STOPS_LAST_INGEST_AT)
                .unwrap()
                .is_some()
        );
    }
}
