use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Event timestamp: whole seconds since the Unix epoch plus a nanosecond part.
///
/// Ordering and equality are lexicographic on `(sec, nsec)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeValue {
    sec: i64,
    nsec: u32,
}

impl TimeValue {
    /// Builds a time value, carrying whole seconds out of `nsec`.
    pub fn new(sec: i64, nsec: u32) -> Self {
        Self {
            sec: sec + i64::from(nsec / NANOS_PER_SEC),
            nsec: nsec % NANOS_PER_SEC,
        }
    }

    /// Samples the wall clock.
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Converts fractional epoch seconds, rounding the fraction to the nearest nanosecond.
    pub fn from_epoch_f64(seconds: f64) -> Option<Self> {
        if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
            return None;
        }
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * f64::from(NANOS_PER_SEC)).round() as u32;
        Some(Self::new(whole as i64, nanos))
    }

    pub fn sec(&self) -> i64 {
        self.sec
    }

    pub fn nsec(&self) -> u32 {
        self.nsec
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.sec, self.nsec).single()
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TimeValue {
    fn from(datetime: DateTime<Tz>) -> Self {
        // Leap seconds are reported by chrono as nanos >= 1e9
        let nsec = datetime.timestamp_subsec_nanos().min(NANOS_PER_SEC - 1);
        Self::new(datetime.timestamp(), nsec)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(datetime) => f.write_str(&datetime.to_rfc3339_opts(SecondsFormat::Nanos, true)),
            None => write!(f, "{}.{:09}", self.sec, self.nsec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = TimeValue::new(100, 999_999_999);
        let b = TimeValue::new(101, 0);
        let c = TimeValue::new(101, 1);

        assert!(a < b);
        assert!(b < c);
        assert_eq!(TimeValue::new(101, 0), b);
    }

    #[test]
    fn test_new_carries_overflowing_nanos() {
        let value = TimeValue::new(10, 2_500_000_000);
        assert_eq!(value.sec(), 12);
        assert_eq!(value.nsec(), 500_000_000);
    }

    #[test]
    fn test_from_epoch_f64() {
        let value = TimeValue::from_epoch_f64(100.1).unwrap();
        assert_eq!(value.sec(), 100);
        assert_eq!(value.nsec(), 100_000_000);

        let negative = TimeValue::from_epoch_f64(-1.5).unwrap();
        assert_eq!(negative.sec(), -2);
        assert_eq!(negative.nsec(), 500_000_000);

        assert!(TimeValue::from_epoch_f64(f64::NAN).is_none());
    }

    #[test]
    fn test_from_datetime_with_offset() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let datetime = offset.with_ymd_and_hms(2013, 2, 28, 12, 0, 0).unwrap();

        let value = TimeValue::from(datetime);
        assert_eq!(value.sec(), 1_362_020_400);
        assert_eq!(value.nsec(), 0);
    }

    #[test]
    fn test_display_is_rfc3339() {
        let value = TimeValue::new(1_362_020_400, 123_456_789);
        assert_eq!(value.to_string(), "2013-02-28T03:00:00.123456789Z");
    }

    #[test]
    fn test_now_is_monotonic_enough() {
        let before = TimeValue::now();
        let after = TimeValue::now();
        assert!(after >= before);
    }
}
