//! Stop table access.
//!
//! `(kind, external_id)` is the natural key, enforced by a UNIQUE
//! constraint; rows are created once and never updated or deleted.

use rusqlite::{Connection, params};
use transit_map_source_models::{NormalizedStop, StopKind};

use crate::DbError;

/// A stored transit stop.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRow {
    /// Surrogate id (SQLite rowid).
    pub id: i64,
    /// Stop category.
    pub kind: StopKind,
    /// Source-assigned identifier.
    pub external_id: String,
    /// Display name.
    pub name: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

/// Inserts a stop unless its natural key is already present.
///
/// Returns whether a row was added; a duplicate is a silent no-op.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub fn insert_if_absent(
    conn: &Connection,
    kind: StopKind,
    stop: &NormalizedStop,
) -> Result<bool, DbError> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO stops (kind, external_id, name, lat, lon)
         VALUES (?, ?, ?, ?, ?)",
        params![
            kind.as_ref(),
            stop.external_id,
            stop.name,
            stop.latitude,
            stop.longitude,
        ],
    )?;
    Ok(changed == 1)
}

/// Returns every stored stop in insertion order.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored kind is unknown.
pub fn list_all(conn: &Connection) -> Result<Vec<StopRow>, DbError> {
    let mut stmt =
        conn.prepare("SELECT id, kind, external_id, name, lat, lon FROM stops ORDER BY id")?;

    let raw: Vec<(i64, String, String, String, f64, f64)> = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })?
        .collect::<Result<_, _>>()?;

    raw.into_iter()
        .map(|(id, kind, external_id, name, latitude, longitude)| {
            let kind = parse_kind(&kind)?;
            Ok(StopRow {
                id,
                kind,
                external_id,
                name,
                latitude,
                longitude,
            })
        })
        .collect()
}

/// Returns the number of stored stops of one kind.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn count_for(conn: &Connection, kind: StopKind) -> Result<u64, DbError> {
    let mut stmt = conn.prepare("SELECT COUNT(*) FROM stops WHERE kind = ?")?;
    let count: i64 = stmt.query_row([kind.as_ref()], |row| row.get(0))?;
    #[allow(clippy::cast_sign_loss)]
    Ok(count as u64)
}

/// Returns the total number of stored stops.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn total(conn: &Connection) -> Result<u64, DbError> {
    let mut stmt = conn.prepare("SELECT COUNT(*) FROM stops")?;
    let count: i64 = stmt.query_row([], |row| row.get(0))?;
    #[allow(clippy::cast_sign_loss)]
    Ok(count as u64)
}

fn parse_kind(text: &str) -> Result<StopKind, DbError> {
    text.parse::<StopKind>().map_err(|e| DbError::Conversion {
        message: format!("unknown stop kind {text:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn stop(external_id: &str, name: &str) -> NormalizedStop {
        NormalizedStop {
            external_id: external_id.to_string(),
            name: name.to_string(),
            latitude: 39.95,
            longitude: -75.16,
        }
    }

    #[test]
    fn duplicate_natural_key_is_ignored() {
        let conn = open_in_memory().unwrap();
        assert!(insert_if_absent(&conn, StopKind::BusStops, &stop("1", "A")).unwrap());
        assert!(!insert_if_absent(&conn, StopKind::BusStops, &stop("1", "A renamed")).unwrap());
        assert_eq!(count_for(&conn, StopKind::BusStops).unwrap(), 1);
    }

    #[test]
    fn same_external_id_under_other_kind_is_distinct() {
        let conn = open_in_memory().unwrap();
        assert!(insert_if_absent(&conn, StopKind::BusStops, &stop("1", "A")).unwrap());
        assert!(insert_if_absent(&conn, StopKind::RailStations, &stop("1", "A")).unwrap());
        assert_eq!(total(&conn).unwrap(), 2);
    }

    #[test]
    fn list_all_preserves_insertion_order() {
        let conn = open_in_memory().unwrap();
        insert_if_absent(&conn, StopKind::RailStations, &stop("r1", "Rail One")).unwrap();
        insert_if_absent(&conn, StopKind::BusStops, &stop("b1", "Bus One")).unwrap();
        insert_if_absent(&conn, StopKind::BusStops, &stop("b2", "Bus Two")).unwrap();

        let rows = list_all(&conn).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Rail One", "Bus One", "Bus Two"]);
        assert_eq!(rows[0].kind, StopKind::RailStations);
    }
}
