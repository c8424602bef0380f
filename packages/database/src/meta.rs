//! Sync metadata in the `meta` key/value table.
//!
//! Holds the POI ingestion cursor (the id of the last stop whose search
//! response was fully processed) and the last-run timestamp of each
//! batcher.

use rusqlite::Connection;

use crate::DbError;

/// Key for the POI ingestion cursor.
pub const POI_CURSOR: &str = "poi_cursor";

/// Key for the stop batcher's last-run timestamp.
pub const STOPS_LAST_INGEST_AT: &str = "stops_last_ingest_at";

/// Key for the POI batcher's last-run timestamp.
pub const POIS_LAST_INGEST_AT: &str = "pois_last_ingest_at";

/// Gets a metadata value.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn get(conn: &Connection, key: &str) -> Result<Option<String>, DbError> {
    let mut stmt = conn.prepare("SELECT value FROM meta WHERE key = ?")?;
    match stmt.query_row([key], |row| row.get(0)) {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DbError::Sqlite(e)),
    }
}

/// Sets a metadata value.
///
/// # Errors
///
/// Returns [`DbError`] if the upsert fails.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<(), DbError> {
    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?, ?)
         ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        [key, value],
    )?;
    Ok(())
}

/// Returns the POI ingestion cursor, if one has been persisted.
///
/// An unparsable stored value is treated as absent so a damaged cursor
/// degrades to a restart from the first stop.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn poi_cursor(conn: &Connection) -> Result<Option<i64>, DbError> {
    Ok(get(conn, POI_CURSOR)?.and_then(|v| v.parse().ok()))
}

/// Persists the POI ingestion cursor.
///
/// # Errors
///
/// Returns [`DbError`] if the upsert fails.
pub fn set_poi_cursor(conn: &Connection, stop_id: i64) -> Result<(), DbError> {
    set(conn, POI_CURSOR, &stop_id.to_string())
}

/// Records the current time under `key` after a batcher invocation.
///
/// # Errors
///
/// Returns [`DbError`] if the upsert fails.
pub fn mark_ingest_run(conn: &Connection, key: &str) -> Result<(), DbError> {
    set(conn, key, &chrono::Utc::now().to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn get_returns_none_for_unknown_key() {
        let conn = open_in_memory().unwrap();
        assert_eq!(get(&conn, "missing").unwrap(), None);
    }

    #[test]
    fn set_overwrites_existing_value() {
        let conn = open_in_memory().unwrap();
        set(&conn, "k", "one").unwrap();
        set(&conn, "k", "two").unwrap();
        assert_eq!(get(&conn, "k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn cursor_round_trips() {
        let conn = open_in_memory().unwrap();
        assert_eq!(poi_cursor(&conn).unwrap(), None);
        set_poi_cursor(&conn, 42).unwrap();
        assert_eq!(poi_cursor(&conn).unwrap(), Some(42));
    }

    #[test]
    fn damaged_cursor_reads_as_absent() {
        let conn = open_in_memory().unwrap();
        set(&conn, POI_CURSOR, "not-a-rowid").unwrap();
        assert_eq!(poi_cursor(&conn).unwrap(), None);
    }
}
