//! Centralized local⇄UTC conversion.
//!
//! Every calculator in the engine works in UTC and converts to local civil
//! time only at presentation boundaries. Rather than re-deriving the system
//! offset at each call site, the offset is captured once into a
//! [`LocalClock`] and passed down, so the whole engine agrees on a single
//! snapshot for the observation window. A fixed-offset constructor makes
//! day-boundary logic testable without touching the host timezone.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// A captured UTC offset used for every local-time conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    offset_seconds: i32,
}

impl LocalClock {
    /// Captures the host's current UTC offset.
    pub fn system() -> Self {
        let offset = chrono::Local::now().offset().fix().local_minus_utc();
        Self {
            offset_seconds: offset,
        }
    }

    /// A clock with an explicit offset in seconds east of UTC.
    pub fn fixed_offset(offset_seconds: i32) -> Self {
        Self { offset_seconds }
    }

    pub fn offset_seconds(&self) -> i32 {
        self.offset_seconds
    }

    /// Offset rendered as `UTC+HH:MM` / `UTC-HH:MM`.
    pub fn offset_label(&self) -> String {
        let sign = if self.offset_seconds >= 0 { '+' } else { '-' };
        let abs = self.offset_seconds.unsigned_abs();
        format!("UTC{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
    }

    /// Converts a UTC instant to naive local civil time.
    pub fn to_local(&self, t: DateTime<Utc>) -> NaiveDateTime {
        (t + Duration::seconds(self.offset_seconds as i64)).naive_utc()
    }

    /// Converts naive local civil time to the corresponding UTC instant.
    pub fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        Utc.from_utc_datetime(&local) - Duration::seconds(self.offset_seconds as i64)
    }

    /// The local calendar date a UTC instant falls on.
    pub fn local_date(&self, t: DateTime<Utc>) -> NaiveDate {
        self.to_local(t).date()
    }

    /// UTC bounds of a local calendar day: [00:00:00, 23:59:59].
    pub fn day_bounds_utc(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        let end = date
            .and_hms_opt(23, 59, 59)
            .expect("end of day is always valid");
        (self.to_utc(start), self.to_utc(end))
    }

    /// The UTC instant of local noon on a given date.
    pub fn local_noon_utc(&self, date: NaiveDate) -> DateTime<Utc> {
        self.to_utc(date.and_hms_opt(12, 0, 0).expect("noon is always valid"))
    }

    /// The UTC instant of local midnight (00:00:00) on a given date.
    pub fn local_midnight_utc(&self, date: NaiveDate) -> DateTime<Utc> {
        self.to_utc(date.and_hms_opt(0, 0, 0).expect("midnight is always valid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_offset_label() {
        assert_eq!(LocalClock::fixed_offset(8 * 3600).offset_label(), "UTC+08:00");
        assert_eq!(
            LocalClock::fixed_offset(-(5 * 3600 + 30 * 60)).offset_label(),
            "UTC-05:30"
        );
        assert_eq!(LocalClock::fixed_offset(0).offset_label(), "UTC+00:00");
    }

    #[test]
    fn test_round_trip() {
        let clock = LocalClock::fixed_offset(-7 * 3600);
        let t = Utc.with_ymd_and_hms(2026, 8, 6, 19, 15, 0).unwrap();
        let local = clock.to_local(t);
        assert_eq!(local.hour(), 12);
        assert_eq!(clock.to_utc(local), t);
    }

    #[test]
    fn test_day_bounds_land_on_local_day_edges() {
        let clock = LocalClock::fixed_offset(9 * 3600);
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let (start, end) = clock.day_bounds_utc(date);

        let local_start = clock.to_local(start);
        let local_end = clock.to_local(end);
        assert_eq!(local_start, date.and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(local_end, date.and_hms_opt(23, 59, 59).unwrap());
        assert!(start < end);
    }

    #[test]
    fn test_local_date_crosses_utc_midnight() {
        // 2026-08-06 23:30 UTC is already Aug 7 at UTC+8.
        let clock = LocalClock::fixed_offset(8 * 3600);
        let t = Utc.with_ymd_and_hms(2026, 8, 6, 23, 30, 0).unwrap();
        assert_eq!(
            clock.local_date(t),
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
        );
    }

    #[test]
    fn test_noon_and_midnight() {
        let clock = LocalClock::fixed_offset(2 * 3600);
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let noon = clock.local_noon_utc(date);
        assert_eq!(noon, Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let midnight = clock.local_midnight_utc(date);
        assert_eq!(
            midnight,
            Utc.with_ymd_and_hms(2026, 1, 14, 22, 0, 0).unwrap()
        );
    }
}
