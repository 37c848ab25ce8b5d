//! Clock abstraction so timestamps stay deterministic under test.

use chrono::{DateTime, SecondsFormat, Utc};

/// Source of wall-clock time for save records, route progress, and cache
/// busting.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current time as an ISO-8601 string with millisecond
    /// precision, e.g. `2026-01-15T10:00:00.000Z`.
    fn iso_timestamp(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Milliseconds since the Unix epoch.
    fn epoch_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Production clock backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Frozen(DateTime<Utc>);

    impl Clock for Frozen {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn test_iso_timestamp_uses_millisecond_zulu_format() {
        let clock = Frozen(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());

        assert_eq!(clock.iso_timestamp(), "2026-01-15T10:00:00.000Z");
    }

    #[test]
    fn test_epoch_millis_matches_chrono() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let clock = Frozen(now);

        assert_eq!(clock.epoch_millis(), now.timestamp_millis());
    }
}
