use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Convert a NEXRAD modified Julian date plus milliseconds past midnight
/// into a UTC timestamp.
///
/// NEXRAD counts days from 1970-01-01 = day 1 (not the astronomical MJD).
/// Returns `None` only when the result is outside chrono's range.
///
/// ```
/// use ar2_wire::julian::modified_julian_to_utc;
///
/// let t = modified_julian_to_utc(1, 0).unwrap();
/// assert_eq!(t.to_rfc3339(), "1970-01-01T00:00:00+00:00");
/// ```
#[must_use]
pub fn modified_julian_to_utc(days: i64, millis: i64) -> Option<DateTime<Utc>> {
    let total = days
        .checked_sub(1)?
        .checked_mul(MILLIS_PER_DAY)?
        .checked_add(millis)?;
    DateTime::from_timestamp_millis(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn day_one_is_unix_epoch() {
        let t = modified_julian_to_utc(1, 0).unwrap();
        assert_eq!(t.timestamp(), 0);
    }

    #[test]
    fn known_volume_date() {
        // 2021-09-19 is 18889 days after the epoch.
        let t = modified_julian_to_utc(18_890, (2 * 60 + 49) * 1000).unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2021, 9, 19));
        assert_eq!((t.hour(), t.minute(), t.second()), (0, 2, 49));
    }

    #[test]
    fn milliseconds_are_preserved() {
        let t = modified_julian_to_utc(1, 1_500).unwrap();
        assert_eq!(t.timestamp_millis(), 1_500);
    }
}
