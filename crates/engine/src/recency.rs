//! Recency filter — keeps records disclosed within the trailing window.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use leakwatch_common::types::VictimRecord;

/// How far back a disclosure may be and still be reported.
pub const RECENCY_WINDOW_DAYS: i64 = 7;

/// Upstream timestamp layout once fractional seconds and offsets are cut off.
const DISCOVERED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of leading characters that make up `DISCOVERED_FORMAT`.
pub const TIMESTAMP_PREFIX_LEN: usize = 19;

/// First `TIMESTAMP_PREFIX_LEN` characters of an upstream timestamp.
pub fn timestamp_prefix(raw: &str) -> &str {
    match raw.char_indices().nth(TIMESTAMP_PREFIX_LEN) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}

/// Parse a record's `discovered` field as a UTC instant.
pub fn discovered_at(record: &VictimRecord) -> Option<DateTime<Utc>> {
    let raw = record.discovered.as_deref()?;
    NaiveDateTime::parse_from_str(timestamp_prefix(raw), DISCOVERED_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Keep the records discovered at or after `now - RECENCY_WINDOW_DAYS`.
///
/// Records with a missing or unparsable timestamp are dropped.
pub fn filter_recent(records: Vec<VictimRecord>, now: DateTime<Utc>) -> Vec<VictimRecord> {
    let cutoff = now - Duration::days(RECENCY_WINDOW_DAYS);
    let total = records.len();

    let recent: Vec<VictimRecord> = records
        .into_iter()
        .filter(|record| discovered_at(record).is_some_and(|at| at >= cutoff))
        .collect();

    tracing::debug!(total, recent = recent.len(), %cutoff, "Applied recency filter");
    recent
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(discovered: Option<&str>) -> VictimRecord {
        VictimRecord {
            discovered: discovered.map(str::to_string),
            ..Default::default()
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let now = at(2024, 5, 8, 12, 0, 0);
        let kept = filter_recent(vec![record(Some("2024-05-01 12:00:00"))], now);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_one_microsecond_older_is_excluded() {
        // Cutoff lands at 12:00:00.000001; the record sits one microsecond before it.
        let now = at(2024, 5, 8, 12, 0, 0) + Duration::microseconds(1);
        let kept = filter_recent(vec![record(Some("2024-05-01 12:00:00"))], now);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_fractional_seconds_and_offsets_ignored() {
        let now = at(2024, 5, 8, 12, 0, 0);
        let kept = filter_recent(
            vec![
                record(Some("2024-05-07 09:30:00.654321")),
                record(Some("2024-05-07 09:30:00+00:00")),
            ],
            now,
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_unparsable_timestamps_dropped() {
        let now = at(2024, 5, 8, 12, 0, 0);
        let kept = filter_recent(
            vec![
                record(None),
                record(Some("")),
                record(Some("yesterday")),
                record(Some("2024-05-07T09:30:00")),
            ],
            now,
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn test_order_preserved_and_old_dropped() {
        let now = at(2024, 5, 8, 12, 0, 0);
        let mut first = record(Some("2024-05-08 01:00:00"));
        first.post_title = Some("first".into());
        let mut second = record(Some("2024-05-02 01:00:00"));
        second.post_title = Some("second".into());
        let old = record(Some("2024-04-01 01:00:00"));

        let kept = filter_recent(vec![first, old, second], now);
        let titles: Vec<_> = kept.iter().map(|r| r.post_title.as_deref()).collect();
        assert_eq!(titles, vec![Some("first"), Some("second")]);
    }

    #[test]
    fn test_timestamp_prefix_multibyte_safe() {
        assert_eq!(timestamp_prefix("2024-05-01 10:00:00.5"), "2024-05-01 10:00:00");
        assert_eq!(timestamp_prefix("short"), "short");
        assert_eq!(timestamp_prefix("ééééééééééééééééééééé").chars().count(), 19);
    }
}
