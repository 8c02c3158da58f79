//! Reset time formatting
//!
//! Renders a bucket's reset timestamp relative to now ("in 2h 5m").

use chrono::{DateTime, Utc};

/// Shown when the reset timestamp cannot be parsed
pub const UNKNOWN_RESET: &str = "at unknown time";

/// Format `target` relative to `now`.
///
/// Minutes below one hour, hours and minutes below one day, days and hours
/// otherwise. A target at or before `now` renders as `"now"`.
pub fn format_reset(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = target.signed_duration_since(now);
    if diff.num_milliseconds() <= 0 {
        return "now".to_string();
    }

    let minutes = diff.num_minutes();
    if minutes < 60 {
        return format!("in {}m", minutes);
    }

    let hours = minutes / 60;
    let remain_minutes = minutes % 60;
    if hours < 24 {
        return format!("in {}h {}m", hours, remain_minutes);
    }

    let days = hours / 24;
    let remain_hours = hours % 24;
    format!("in {}d {}h", days, remain_hours)
}

/// Parse an ISO-8601 timestamp and format it relative to `now`
pub fn format_reset_iso(iso: &str, now: DateTime<Utc>) -> String {
    match parse_timestamp(iso) {
        Some(target) => format_reset(target, now),
        None => {
            tracing::debug!(resets_at = %iso, "Unparseable reset timestamp");
            UNKNOWN_RESET.to_string()
        }
    }
}

/// Parse an RFC 3339 timestamp, tolerating a missing offset (treated as UTC)
pub fn parse_timestamp(iso: &str) -> Option<DateTime<Utc>> {
    let iso = iso.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_past_and_equal_are_now() {
        assert_eq!(format_reset(now(), now()), "now");
        assert_eq!(format_reset(now() - Duration::seconds(1), now()), "now");
        assert_eq!(format_reset(now() - Duration::days(3), now()), "now");
    }

    #[test]
    fn test_minutes_bucket() {
        assert_eq!(format_reset(now() + Duration::seconds(30), now()), "in 0m");
        assert_eq!(format_reset(now() + Duration::minutes(1), now()), "in 1m");
        assert_eq!(format_reset(now() + Duration::seconds(59 * 60 + 59), now()), "in 59m");
    }

    #[test]
    fn test_hours_bucket() {
        assert_eq!(format_reset(now() + Duration::minutes(60), now()), "in 1h 0m");
        assert_eq!(format_reset(now() + Duration::minutes(125), now()), "in 2h 5m");
        assert_eq!(format_reset(now() + Duration::minutes(23 * 60 + 59), now()), "in 23h 59m");
    }

    #[test]
    fn test_days_bucket() {
        assert_eq!(format_reset(now() + Duration::hours(24), now()), "in 1d 0h");
        assert_eq!(
            format_reset(now() + Duration::hours(6 * 24 + 23) + Duration::minutes(59), now()),
            "in 6d 23h"
        );
    }

    #[test]
    fn test_format_reset_iso() {
        assert_eq!(format_reset_iso("2026-03-01T14:30:00+00:00", now()), "in 2h 30m");
        assert_eq!(format_reset_iso("2026-03-01T14:30:00.123456Z", now()), "in 2h 30m");
        // Offsets are honored
        assert_eq!(format_reset_iso("2026-03-01T13:10:00+01:00", now()), "in 10m");
        assert_eq!(format_reset_iso("2026-02-28T00:00:00Z", now()), "now");
    }

    #[test]
    fn test_format_reset_iso_without_offset() {
        assert_eq!(format_reset_iso("2026-03-01T12:45:00", now()), "in 45m");
    }

    #[test]
    fn test_format_reset_iso_invalid() {
        assert_eq!(format_reset_iso("not a date", now()), UNKNOWN_RESET);
        assert_eq!(format_reset_iso("", now()), UNKNOWN_RESET);
    }
}
