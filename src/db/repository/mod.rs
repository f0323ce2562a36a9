//! Repository layer — entity-scoped read/write queries for the analytics core.
//!
//! All analytics inputs come through these functions; the core itself never
//! touches SQL. Timestamps are stored as RFC 3339 UTC strings so BETWEEN
//! comparisons in SQL match chronological order.

mod dosage;
mod event;
mod medication;
mod patient;

pub use dosage::*;
pub use event::*;
pub use medication::*;
pub use patient::*;

use chrono::{DateTime, SecondsFormat, Utc};

use super::DatabaseError;

/// Render a timestamp in the canonical column format ("YYYY-MM-DDTHH:MM:SSZ").
pub(crate) fn ts_to_sql(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn ts_from_sql(raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid timestamp '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_column_format_is_sortable() {
        let a = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 6).unwrap();
        assert_eq!(ts_to_sql(&a), "2026-01-02T03:04:05Z");
        assert!(ts_to_sql(&a) < ts_to_sql(&b));
        assert_eq!(ts_from_sql(&ts_to_sql(&a)).unwrap(), a);
    }

    #[test]
    fn bad_timestamp_is_a_constraint_violation() {
        assert!(matches!(
            ts_from_sql("yesterday-ish"),
            Err(DatabaseError::ConstraintViolation(_))
        ));
    }
}
