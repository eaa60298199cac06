//! Controller timestamps: milliseconds since the Unix epoch.

use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};

/// Convert a controller timestamp to local time.
///
/// Returns `None` only when `ms` lies outside the range chrono can represent.
pub fn from_wire(ms: i64) -> Option<DateTime<Local>> {
    DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.with_timezone(&Local))
}

/// Convert a timestamp to controller format.
///
/// Sub-second precision is dropped: `from_wire(to_wire(t))` is `t` truncated to whole seconds.
pub fn to_wire<Tz: TimeZone>(dt: &DateTime<Tz>) -> i64 {
    dt.timestamp() * 1000
}

/// ISO 8601 with offset, as the account API expects for `startdate`/`enddate`.
pub fn format_iso<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    #[test]
    fn from_wire_reads_epoch_millis() {
        let dt = from_wire(1_700_000_000_000).unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
        assert_eq!(dt.timestamp_subsec_millis(), 0);
    }

    #[test]
    fn negative_values_are_before_the_epoch() {
        let dt = from_wire(-86_400_000).unwrap();
        assert_eq!(dt.timestamp(), -86_400);
    }

    #[test]
    fn out_of_range_is_none() {
        assert!(from_wire(i64::MAX).is_none());
    }

    #[test]
    fn round_trip_truncates_to_seconds() {
        let t = from_wire(1_700_000_000_987).unwrap();
        assert_eq!(to_wire(&t), 1_700_000_000_000);
        let back = from_wire(to_wire(&t)).unwrap();
        assert_eq!(back, t.with_nanosecond(0).unwrap());
    }

    #[test]
    fn format_iso_keeps_offset() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = tz.with_ymd_and_hms(2015, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(format_iso(&dt), "2015-03-01T00:00:00+02:00");
    }
}
