//! Split Julian Date with calendar and `chrono` interop.
//!
//! The ephemeris kernel and every search in the almanac layer index time as
//! a Julian Date. Storing the date in two parts (`jd1` anchored at
//! midnight, `jd2` the day fraction) keeps sub-second precision through a
//! year of arithmetic, which a single f64 JD cannot.
//!
//! Calendar conversion follows the ERFA `eraCal2jd`/`eraJd2cal` integer
//! algorithms, valid for the whole Gregorian era.

use crate::constants::{J2000_JD, MJD_ZERO_POINT, SECONDS_PER_DAY, UNIX_EPOCH_JD};
use chrono::{DateTime, Timelike, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JulianDate {
    pub jd1: f64,
    pub jd2: f64,
}

impl JulianDate {
    pub fn new(jd1: f64, jd2: f64) -> Self {
        Self { jd1, jd2 }
    }

    pub fn from_f64(jd: f64) -> Self {
        Self::new(jd, 0.0)
    }

    pub fn j2000() -> Self {
        Self::new(J2000_JD, 0.0)
    }

    pub fn jd1(&self) -> f64 {
        self.jd1
    }

    pub fn jd2(&self) -> f64 {
        self.jd2
    }

    pub fn to_f64(&self) -> f64 {
        self.jd1 + self.jd2
    }

    pub fn add_days(&self, days: f64) -> Self {
        Self::new(self.jd1, self.jd2 + days)
    }

    pub fn add_seconds(&self, seconds: f64) -> Self {
        self.add_days(seconds / SECONDS_PER_DAY)
    }

    /// Days elapsed since the J2000.0 epoch, preserving the split.
    pub fn days_since_j2000(&self) -> f64 {
        (self.jd1 - J2000_JD) + self.jd2
    }

    /// Julian centuries elapsed since J2000.0.
    pub fn centuries_since_j2000(&self) -> f64 {
        self.days_since_j2000() / crate::constants::DAYS_PER_JULIAN_CENTURY
    }

    pub fn from_calendar(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: f64) -> Self {
        // eraCal2jd convention: jd1 is the full JD at midnight, jd2 the
        // fraction of day.
        let my = (month as i32 - 14) / 12;
        let iypmy = year + my;

        let mjd = ((1461 * (iypmy + 4800)) / 4 + (367 * (month as i32 - 2 - 12 * my)) / 12
            - (3 * ((iypmy + 4900) / 100)) / 4
            + day as i32
            - 2432076) as f64;

        let jd1 = MJD_ZERO_POINT + mjd;
        let jd2 = (60.0 * (60 * hour as i32 + minute as i32) as f64 + second) / SECONDS_PER_DAY;

        Self::new(jd1, jd2)
    }

    /// Splits back into (year, month, day, fraction-of-day).
    ///
    /// Inverse of [`JulianDate::from_calendar`], using the eraJd2cal
    /// integer decomposition.
    pub fn to_calendar(&self) -> (i32, u32, u32, f64) {
        let jd = self.jd1 + self.jd2 + 0.5;
        let z = jd.floor();
        let frac = jd - z;

        let mut l = z as i64 + 68569;
        let n = (4 * l) / 146097;
        l -= (146097 * n + 3) / 4;
        let i = (4000 * (l + 1)) / 1461001;
        l = l - (1461 * i) / 4 + 31;
        let j = (80 * l) / 2447;
        let day = l - (2447 * j) / 80;
        l = j / 11;
        let month = j + 2 - 12 * l;
        let year = 100 * (n - 49) + i + l;

        (year as i32, month as u32, day as u32, frac)
    }

    /// Builds a UTC Julian Date from a `chrono` instant.
    pub fn from_datetime(t: DateTime<Utc>) -> Self {
        let seconds = t.timestamp();
        let nanos = t.nanosecond().min(999_999_999);

        let days = seconds.div_euclid(86_400);
        let remainder = seconds.rem_euclid(86_400);
        let jd1 = UNIX_EPOCH_JD + days as f64;
        let jd2 = (remainder as f64 + nanos as f64 / 1e9) / SECONDS_PER_DAY;
        Self::new(jd1, jd2)
    }

    /// Converts back to a `chrono` UTC instant.
    ///
    /// Returns `None` for dates outside chrono's representable range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let seconds = (self.jd1 - UNIX_EPOCH_JD) * SECONDS_PER_DAY + self.jd2 * SECONDS_PER_DAY;
        let mut whole = seconds.floor() as i64;
        let mut nanos = ((seconds - seconds.floor()) * 1e9).round() as u32;
        if nanos >= 1_000_000_000 {
            whole += 1;
            nanos -= 1_000_000_000;
        }
        DateTime::from_timestamp(whole, nanos)
    }
}

impl fmt::Display for JulianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {:.9}", self.to_f64())
    }
}

impl From<f64> for JulianDate {
    fn from(jd: f64) -> Self {
        Self::from_f64(jd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_j2000_epoch() {
        let jd = JulianDate::from_calendar(2000, 1, 1, 12, 0, 0.0);
        assert!((jd.to_f64() - J2000_JD).abs() < 1e-9);
    }

    #[test]
    fn test_unix_epoch() {
        let jd = JulianDate::from_calendar(1970, 1, 1, 0, 0, 0.0);
        assert!((jd.to_f64() - UNIX_EPOCH_JD).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let jd = JulianDate::j2000();
        assert_eq!(jd.add_days(1.0).to_f64(), 2451546.0);
        assert!((jd.add_seconds(3600.0).to_f64() - 2_451_545.041_666_666_5).abs() < 1e-12);
    }

    #[test]
    fn test_calendar_round_trip() {
        let cases = [
            (2026, 8, 6, 9, 30, 15.5),
            (2000, 1, 1, 12, 0, 0.0),
            (1999, 12, 31, 23, 59, 59.0),
            (2024, 2, 29, 6, 0, 0.0),
        ];
        for (y, m, d, hh, mm, ss) in cases {
            let jd = JulianDate::from_calendar(y, m, d, hh, mm, ss);
            let (ry, rm, rd, frac) = jd.to_calendar();
            assert_eq!((ry, rm, rd), (y, m as u32, d as u32));
            let expected_frac = (3600.0 * hh as f64 + 60.0 * mm as f64 + ss) / SECONDS_PER_DAY;
            assert!((frac - expected_frac).abs() < 1e-9);
        }
    }

    #[test]
    fn test_datetime_round_trip() {
        let t = Utc.with_ymd_and_hms(2026, 8, 6, 12, 34, 56).unwrap();
        let jd = JulianDate::from_datetime(t);
        let back = jd.to_datetime().unwrap();
        assert!((back - t).num_milliseconds().abs() <= 1);
    }

    #[test]
    fn test_from_datetime_matches_calendar() {
        let t = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();
        let via_chrono = JulianDate::from_datetime(t);
        let via_calendar = JulianDate::from_calendar(2026, 3, 20, 0, 0, 0.0);
        assert!((via_chrono.to_f64() - via_calendar.to_f64()).abs() < 1e-9);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let original = JulianDate::new(J2000_JD, 0.123456789);
        let json = serde_json::to_string(&original).unwrap();
        let back: JulianDate = serde_json::from_str(&json).unwrap();
        assert_eq!(original, back);
    }
}
