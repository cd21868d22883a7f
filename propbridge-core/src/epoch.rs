//! Julian date helpers for the config epoch.

use chrono::{DateTime, TimeZone, Utc};

/// Julian date of the Unix epoch, 1970-01-01T00:00:00Z.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian date (UTC scale, no leap-second correction) of `at`.
pub fn julian_date(at: &DateTime<Utc>) -> f64 {
    let seconds = at.timestamp() as f64 + f64::from(at.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Inverse of [`julian_date`]. `None` if the date is outside chrono's range.
pub fn utc_from_julian_date(jd: f64) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }
    let seconds = (jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY;
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round() as u32;
    Utc.timestamp_opt(whole as i64, nanos.min(999_999_999)).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_epoch_is_2440587_5() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(julian_date(&epoch), UNIX_EPOCH_JD);
    }

    #[test]
    fn j2000_noon() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(julian_date(&j2000), 2_451_545.0);
    }

    #[test]
    fn half_day_offsets() {
        let midnight = Utc.with_ymd_and_hms(2023, 2, 24, 0, 0, 0).unwrap();
        assert_eq!(julian_date(&midnight), 2_460_000.5);
    }

    #[test]
    fn roundtrip_to_the_second() {
        let at = Utc.with_ymd_and_hms(2024, 6, 30, 18, 45, 10).unwrap();
        let back = utc_from_julian_date(julian_date(&at)).unwrap();
        assert!((back - at).num_milliseconds().abs() < 1);
    }

    #[test]
    fn non_finite_has_no_utc() {
        assert!(utc_from_julian_date(f64::NAN).is_none());
    }
}
