//! One-shot event firing against a polled clock.
//!
//! Rise/set/transit instants and solar terms are recomputed every minute,
//! but each must be announced exactly once, no matter how many one-second
//! polls land inside the firing tolerance. The scheduler remembers what
//! has fired by (body, kind, instant-rounded-to-second); the key set is
//! scoped to the running day and reset at rollover, when the scheduled
//! instants are superseded anyway.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use pelorus_ephemeris::Body;
use std::collections::HashSet;

/// What kind of instant fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Rise,
    Set,
    Transit,
    SolarTerm,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Rise => "rise",
            Self::Set => "set",
            Self::Transit => "transit",
            Self::SolarTerm => "solar term",
        }
    }
}

/// A scheduled instant the driver wants announced.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent {
    pub body: Body,
    pub kind: EventKind,
    /// Human label, e.g. "sunrise" or a solar-term name.
    pub label: String,
    pub instant: DateTime<Utc>,
    /// Azimuth for rise/set, altitude for transit, absent for terms.
    pub angle: Option<f64>,
}

/// One announcement, produced at most once per tracked instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub body: Body,
    pub kind: EventKind,
    pub label: String,
    pub instant: DateTime<Utc>,
    pub angle: Option<f64>,
}

/// Polled once per second with "now"; fires each tracked instant once.
#[derive(Debug)]
pub struct EventScheduler {
    tolerance: Duration,
    fired: HashSet<String>,
    day: Option<NaiveDate>,
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventScheduler {
    /// The standard ±1.5 s tolerance window.
    pub fn new() -> Self {
        Self::with_tolerance(Duration::milliseconds(1500))
    }

    pub fn with_tolerance(tolerance: Duration) -> Self {
        Self {
            tolerance,
            fired: HashSet::new(),
            day: None,
        }
    }

    /// Resets the fired-key set when the local day changes.
    pub fn roll_day(&mut self, date: NaiveDate) {
        if self.day != Some(date) {
            self.day = Some(date);
            self.fired.clear();
        }
    }

    /// Checks every tracked event against "now" and returns the ones that
    /// fire on this poll.
    pub fn poll(&mut self, now: DateTime<Utc>, tracked: &[TrackedEvent]) -> Vec<Notification> {
        let mut fired = Vec::new();
        for event in tracked {
            if (now - event.instant).abs() > self.tolerance {
                continue;
            }
            let key = fire_key(event);
            if !self.fired.insert(key) {
                continue;
            }
            fired.push(Notification {
                body: event.body,
                kind: event.kind,
                label: event.label.clone(),
                instant: event.instant,
                angle: event.angle,
            });
        }
        fired
    }
}

fn fire_key(event: &TrackedEvent) -> String {
    format!(
        "{}:{}:{}",
        event.body.label(),
        event.kind.label(),
        event.instant.format("%Y-%m-%dT%H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 10, 30, 0).unwrap()
    }

    fn sunrise() -> TrackedEvent {
        TrackedEvent {
            body: Body::Sun,
            kind: EventKind::Rise,
            label: "sunrise".into(),
            instant: instant(),
            angle: Some(62.0),
        }
    }

    #[test]
    fn fires_exactly_once_inside_tolerance() {
        let mut scheduler = EventScheduler::new();
        scheduler.roll_day(instant().date_naive());
        let tracked = vec![sunrise()];

        // Three consecutive one-second polls all inside ±1.5 s.
        let polls = [
            instant() - Duration::seconds(1),
            instant(),
            instant() + Duration::seconds(1),
        ];
        let mut total = 0;
        for now in polls {
            total += scheduler.poll(now, &tracked).len();
        }
        assert_eq!(total, 1);
    }

    #[test]
    fn does_not_fire_outside_tolerance() {
        let mut scheduler = EventScheduler::new();
        scheduler.roll_day(instant().date_naive());
        let tracked = vec![sunrise()];

        assert!(scheduler
            .poll(instant() - Duration::seconds(2), &tracked)
            .is_empty());
        assert!(scheduler
            .poll(instant() + Duration::seconds(2), &tracked)
            .is_empty());
    }

    #[test]
    fn distinct_instants_fire_independently() {
        let mut scheduler = EventScheduler::new();
        scheduler.roll_day(instant().date_naive());

        let mut moonset = sunrise();
        moonset.body = Body::Moon;
        moonset.kind = EventKind::Set;
        moonset.label = "moonset".into();

        let tracked = vec![sunrise(), moonset];
        let fired = scheduler.poll(instant(), &tracked);
        assert_eq!(fired.len(), 2);
    }

    #[test]
    fn notification_carries_angle_and_label() {
        let mut scheduler = EventScheduler::new();
        scheduler.roll_day(instant().date_naive());
        let fired = scheduler.poll(instant(), &[sunrise()]);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].label, "sunrise");
        assert_eq!(fired[0].angle, Some(62.0));
        assert_eq!(fired[0].kind, EventKind::Rise);
    }

    #[test]
    fn day_rollover_resets_fired_keys() {
        let mut scheduler = EventScheduler::new();
        scheduler.roll_day(instant().date_naive());
        assert_eq!(scheduler.poll(instant(), &[sunrise()]).len(), 1);
        assert!(scheduler.poll(instant(), &[sunrise()]).is_empty());

        // New day: recomputed instants may legitimately collide with
        // yesterday's keys, so the set must be discardable.
        scheduler.roll_day(instant().date_naive() + Duration::days(1));
        assert_eq!(scheduler.poll(instant(), &[sunrise()]).len(), 1);
    }

    #[test]
    fn same_day_roll_is_a_no_op() {
        let mut scheduler = EventScheduler::new();
        scheduler.roll_day(instant().date_naive());
        assert_eq!(scheduler.poll(instant(), &[sunrise()]).len(), 1);
        scheduler.roll_day(instant().date_naive());
        assert!(scheduler.poll(instant(), &[sunrise()]).is_empty());
    }
}
