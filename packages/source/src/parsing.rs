//! Shared parsing utilities for source API payloads.
//!
//! The stop-listing API serves ids and coordinates inconsistently (JSON
//! strings in some deployments, numbers in others), so field extraction
//! goes through [`serde_json::Value`] helpers instead of typed struct
//! fields.

/// Extracts an identifier as a string from a string or numeric JSON value.
#[must_use]
pub fn id_string(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extracts a coordinate from a string or numeric JSON value. Returns
/// `None` if missing, unparseable, or zero.
#[must_use]
pub fn coord_f64(value: Option<&serde_json::Value>) -> Option<f64> {
    let parsed = match value? {
        serde_json::Value::String(s) => s.parse::<f64>().ok()?,
        serde_json::Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    if parsed == 0.0 {
        return None;
    }
    Some(parsed)
}

/// Extracts an integer distance from a string or numeric JSON value.
///
/// Fractional distances are truncated toward zero, matching how the
/// search API reports whole meters.
#[must_use]
pub fn distance_i64(value: Option<&serde_json::Value>) -> Option<i64> {
    match value? {
        serde_json::Value::String(s) => s.parse::<f64>().ok().map(|d| d as i64),
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|d| d as i64)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_accepts_strings_and_numbers() {
        assert_eq!(id_string(Some(&json!("1392"))).as_deref(), Some("1392"));
        assert_eq!(id_string(Some(&json!(1392))).as_deref(), Some("1392"));
    }

    #[test]
    fn id_rejects_empty_and_missing() {
        assert!(id_string(Some(&json!(""))).is_none());
        assert!(id_string(None).is_none());
        assert!(id_string(Some(&json!(null))).is_none());
    }

    #[test]
    fn coord_parses_text_and_numeric() {
        assert_eq!(coord_f64(Some(&json!("39.9525020"))), Some(39.952_502));
        assert_eq!(coord_f64(Some(&json!(-75.165_298))), Some(-75.165_298));
    }

    #[test]
    fn coord_rejects_zero_and_garbage() {
        assert!(coord_f64(Some(&json!("0.0"))).is_none());
        assert!(coord_f64(Some(&json!(0))).is_none());
        assert!(coord_f64(Some(&json!("not-a-coord"))).is_none());
    }

    #[test]
    fn distance_parses_text_numeric_and_fractional() {
        assert_eq!(distance_i64(Some(&json!(120))), Some(120));
        assert_eq!(distance_i64(Some(&json!("120"))), Some(120));
        assert_eq!(distance_i64(Some(&json!(120.7))), Some(120));
    }

    #[test]
    fn distance_rejects_missing() {
        assert!(distance_i64(None).is_none());
        assert!(distance_i64(Some(&json!([]))).is_none());
    }
}
