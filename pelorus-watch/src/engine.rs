//! The driver: one-second ticks, minute-throttled astronomy.
//!
//! A full recomputation (apparent places, two day-window searches, moon
//! phase, the solar-term reminder) is too heavy to run on every
//! one-second tick, so it is throttled to once per distinct local minute.
//! The scheduler still polls every tick against the instants from the
//! last recomputation, and a firing forces one out-of-band recomputation
//! so the display immediately shows the next upcoming event.
//!
//! The engine owns all the day/year caches (the solar-term calendar, the
//! scheduler's fired keys, the snapshot) as a single writer; fixes arrive
//! as whole values, so no reader can ever see a torn location.

use crate::lighting::LightingStage;
use crate::nmea::Fix;
use crate::scheduler::{EventKind, EventScheduler, Notification, TrackedEvent};
use crate::smoothing::SlidingWindow;
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use pelorus_almanac::{
    moonphase, riseset, AlmanacError, AlmanacResult, DayReport, HorizonCrossings, MoonPhase,
    SkyModel, SolarTermCalendar,
};
use pelorus_core::{LocalClock, Observer};
use pelorus_ephemeris::{Body, Horizontal};

/// A computed value, or the reason there is none.
///
/// The three non-ready states are deliberately distinct: no fix yet, the
/// permanent ephemeris-unavailable condition, and a transient computation
/// failure that the next minutely recomputation retries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum State<T> {
    Ready(T),
    AwaitingFix,
    Unavailable,
    Failed,
}

impl<T> State<T> {
    fn from_result(result: AlmanacResult<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(AlmanacError::Unavailable) => Self::Unavailable,
            Err(AlmanacError::Computation(message)) => {
                log::debug!("computation failed: {message}");
                Self::Failed
            }
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Everything the display and logbook need from one recomputation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub computed_at: DateTime<Utc>,
    pub sun: State<Horizontal>,
    pub moon: State<Horizontal>,
    pub sun_day: State<DayReport>,
    pub moon_day: State<DayReport>,
    pub phase: State<MoonPhase>,
    pub reminder: Option<String>,
}

impl Snapshot {
    /// Lighting stage, when the solar altitude is known.
    pub fn lighting(&self) -> Option<LightingStage> {
        self.sun
            .ready()
            .map(|h| LightingStage::from_solar_altitude(h.altitude))
    }
}

/// Result of one tick.
#[derive(Debug)]
pub struct TickReport {
    pub notifications: Vec<Notification>,
    /// Whether this tick crossed a minute boundary (and recomputed).
    pub minute_boundary: bool,
}

/// The celestial watch engine.
pub struct Engine<M> {
    model: M,
    clock: LocalClock,
    observer: Option<Observer>,
    speed: SlidingWindow,
    course: SlidingWindow,
    terms: SolarTermCalendar,
    scheduler: EventScheduler,
    snapshot: Option<Snapshot>,
    last_minute: Option<NaiveDateTime>,
}

impl<M: SkyModel> Engine<M> {
    pub fn new(model: M, clock: LocalClock, smoothing_seconds: f64) -> Self {
        Self {
            model,
            clock,
            observer: None,
            speed: SlidingWindow::new(smoothing_seconds),
            course: SlidingWindow::new(smoothing_seconds),
            terms: SolarTermCalendar::empty(),
            scheduler: EventScheduler::new(),
            snapshot: None,
            last_minute: None,
        }
    }

    pub fn clock(&self) -> &LocalClock {
        &self.clock
    }

    pub fn observer(&self) -> Option<Observer> {
        self.observer
    }

    pub fn smoothed_speed(&self) -> f64 {
        self.speed.mean()
    }

    pub fn smoothed_course(&self) -> f64 {
        self.course.mean()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Accepts one decoded fix: replaces the observer snapshot whole and
    /// feeds the smoothing channels.
    pub fn apply_fix(&mut self, fix: Fix, now: DateTime<Utc>) {
        match Observer::from_degrees(fix.latitude, fix.longitude) {
            Ok(observer) => {
                self.observer = Some(observer);
                let timestamp =
                    now.timestamp() as f64 + now.timestamp_subsec_millis() as f64 / 1000.0;
                self.speed.push(timestamp, fix.speed_knots);
                self.course.push(timestamp, fix.course);
            }
            Err(err) => {
                log::debug!("dropping fix with invalid coordinates: {err}");
            }
        }
    }

    /// Forgets the current position, e.g. when the feed drops.
    pub fn clear_fix(&mut self) {
        self.observer = None;
        self.speed.clear();
        self.course.clear();
    }

    /// One driver tick. Call at roughly 1 Hz.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickReport {
        let local_date = self.clock.local_date(now);
        self.scheduler.roll_day(local_date);

        let local = self.clock.to_local(now);
        let minute = local
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(local);
        let minute_boundary = self.last_minute != Some(minute);
        if minute_boundary {
            self.last_minute = Some(minute);
            self.recompute(now);
        }

        let tracked = self.tracked_events();
        let notifications = self.scheduler.poll(now, &tracked);
        if !notifications.is_empty() {
            // A firing means the displayed rise/set values just went
            // stale; refresh without waiting for the minute throttle.
            self.recompute(now);
        }

        TickReport {
            notifications,
            minute_boundary,
        }
    }

    fn recompute(&mut self, now: DateTime<Utc>) {
        let local_date = self.clock.local_date(now);

        match self.terms.refresh(&self.model, local_date.year()) {
            Ok(true) => {
                log::info!(
                    "solar terms computed for {}: {} entries",
                    local_date.year(),
                    self.terms.terms().len()
                );
            }
            Ok(false) => {}
            Err(err) => {
                log::debug!("solar term computation unavailable: {err}");
            }
        }

        let phase = State::from_result(moonphase::compute(&self.model, now));
        let reminder = self.terms.reminder(local_date, &self.clock);

        let (sun, moon, sun_day, moon_day) = match self.observer {
            None => (
                State::AwaitingFix,
                State::AwaitingFix,
                State::AwaitingFix,
                State::AwaitingFix,
            ),
            Some(observer) => (
                State::from_result(self.model.apparent(Body::Sun, now, &observer)),
                State::from_result(self.model.apparent(Body::Moon, now, &observer)),
                State::from_result(riseset::day_report(
                    &self.model,
                    Body::Sun,
                    &observer,
                    local_date,
                    &self.clock,
                )),
                State::from_result(riseset::day_report(
                    &self.model,
                    Body::Moon,
                    &observer,
                    local_date,
                    &self.clock,
                )),
            ),
        };

        self.snapshot = Some(Snapshot {
            computed_at: now,
            sun,
            moon,
            sun_day,
            moon_day,
            phase,
            reminder,
        });
    }

    fn tracked_events(&self) -> Vec<TrackedEvent> {
        let mut tracked = Vec::new();

        if let Some(snapshot) = &self.snapshot {
            if let State::Ready(report) = &snapshot.sun_day {
                push_day_events(&mut tracked, Body::Sun, report);
            }
            if let State::Ready(report) = &snapshot.moon_day {
                push_day_events(&mut tracked, Body::Moon, report);
            }
        }

        for term in self.terms.terms() {
            tracked.push(TrackedEvent {
                body: Body::Sun,
                kind: EventKind::SolarTerm,
                label: term.name.to_string(),
                instant: term.instant,
                angle: None,
            });
        }

        tracked
    }
}

fn push_day_events(tracked: &mut Vec<TrackedEvent>, body: Body, report: &DayReport) {
    let (rise_label, set_label, transit_label) = match body {
        Body::Sun => ("sunrise", "sunset", "sun transit"),
        Body::Moon => ("moonrise", "moonset", "moon transit"),
    };

    if let HorizonCrossings::Normal { rise, set } = &report.crossings {
        if let Some(rise) = rise {
            tracked.push(TrackedEvent {
                body,
                kind: EventKind::Rise,
                label: rise_label.to_string(),
                instant: rise.time,
                angle: Some(rise.azimuth),
            });
        }
        if let Some(set) = set {
            tracked.push(TrackedEvent {
                body,
                kind: EventKind::Set,
                label: set_label.to_string(),
                instant: set.time,
                angle: Some(set.azimuth),
            });
        }
    }

    tracked.push(TrackedEvent {
        body,
        kind: EventKind::Transit,
        label: transit_label.to_string(),
        instant: report.transit.time,
        angle: Some(report.transit.altitude),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pelorus_core::angle::wrap_to_360;
    use std::cell::Cell;
    use std::f64::consts::TAU;

    /// Analytic sky with a call counter: sinusoidal altitude rising at
    /// 06:00 UTC, linearly advancing solar longitude.
    struct CountingSky {
        calls: Cell<usize>,
    }

    impl CountingSky {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl SkyModel for CountingSky {
        fn apparent(
            &self,
            _body: Body,
            t: DateTime<Utc>,
            _observer: &Observer,
        ) -> AlmanacResult<Horizontal> {
            self.calls.set(self.calls.get() + 1);
            let fraction = t.num_seconds_from_midnight() as f64 / 86_400.0;
            Ok(Horizontal {
                altitude: 60.0 * (TAU * (fraction - 0.25)).sin(),
                azimuth: wrap_to_360(fraction * 360.0),
                ecliptic_longitude: 0.0,
                distance_au: 1.0,
            })
        }

        fn ecliptic_longitude(&self, body: Body, t: DateTime<Utc>) -> AlmanacResult<f64> {
            self.calls.set(self.calls.get() + 1);
            let epoch = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
            let days = (t - epoch).num_milliseconds() as f64 / 86_400_000.0;
            Ok(match body {
                Body::Sun => wrap_to_360(280.0 + days * 360.0 / 365.2422),
                Body::Moon => wrap_to_360(100.0 + days * 13.176),
            })
        }

        fn geocentric(&self, body: Body, _t: DateTime<Utc>) -> AlmanacResult<[f64; 3]> {
            Ok(match body {
                Body::Sun => [1.496e8, 0.0, 0.0],
                Body::Moon => [0.0, 384_400.0, 0.0],
            })
        }
    }

    fn engine() -> Engine<CountingSky> {
        Engine::new(CountingSky::new(), LocalClock::fixed_offset(0), 20.0)
    }

    fn fix() -> Fix {
        Fix {
            latitude: 37.3873,
            longitude: -121.9724,
            speed_knots: 10.0,
            course: 90.0,
        }
    }

    #[test]
    fn first_tick_recomputes_and_awaits_fix() {
        let mut engine = engine();
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 5).unwrap();

        let report = engine.tick(now);
        assert!(report.minute_boundary);

        let snapshot = engine.snapshot().expect("snapshot after first tick");
        assert_eq!(snapshot.sun, State::AwaitingFix);
        assert_eq!(snapshot.sun_day, State::AwaitingFix);
        assert!(snapshot.phase.ready().is_some());
    }

    #[test]
    fn recomputation_is_throttled_to_the_minute() {
        let mut engine = engine();
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 5).unwrap();
        engine.apply_fix(fix(), now);

        engine.tick(now);
        let calls_after_first = engine.model.calls.get();

        // Same minute: no recomputation, no extra model traffic.
        let report = engine.tick(now + Duration::seconds(1));
        assert!(!report.minute_boundary);
        assert_eq!(engine.model.calls.get(), calls_after_first);

        // Next minute: recomputation happens.
        let report = engine.tick(now + Duration::seconds(60));
        assert!(report.minute_boundary);
        assert!(engine.model.calls.get() > calls_after_first);
    }

    #[test]
    fn fix_populates_positions_and_smoothing() {
        let mut engine = engine();
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 5).unwrap();
        engine.apply_fix(fix(), now);
        engine.tick(now);

        let snapshot = engine.snapshot().unwrap();
        assert!(snapshot.sun.ready().is_some());
        assert!(snapshot.sun_day.ready().is_some());
        assert!((engine.smoothed_speed() - 10.0).abs() < 1e-12);
        assert!((engine.smoothed_course() - 90.0).abs() < 1e-12);
        assert!(engine.observer().is_some());
    }

    #[test]
    fn clear_fix_returns_to_awaiting() {
        let mut engine = engine();
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 5).unwrap();
        engine.apply_fix(fix(), now);
        engine.tick(now);
        engine.clear_fix();
        engine.tick(now + Duration::seconds(60));

        let snapshot = engine.snapshot().unwrap();
        assert_eq!(snapshot.sun, State::AwaitingFix);
        assert_eq!(engine.smoothed_speed(), 0.0);
    }

    #[test]
    fn invalid_fix_is_dropped() {
        let mut engine = engine();
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 5).unwrap();
        engine.apply_fix(
            Fix {
                latitude: 95.0,
                longitude: 0.0,
                speed_knots: 1.0,
                course: 0.0,
            },
            now,
        );
        assert!(engine.observer().is_none());
    }

    #[test]
    fn sunrise_fires_exactly_once_and_forces_refresh() {
        let mut engine = engine();
        // Compute the snapshot a minute before the sine sky's 06:00 rise.
        let before = Utc.with_ymd_and_hms(2026, 8, 6, 5, 59, 0).unwrap();
        engine.apply_fix(fix(), before);
        engine.tick(before);

        let rise_time = Utc.with_ymd_and_hms(2026, 8, 6, 6, 0, 0).unwrap();
        let report = engine.tick(rise_time);
        let sunrises: Vec<_> = report
            .notifications
            .iter()
            .filter(|n| n.label == "sunrise")
            .collect();
        assert_eq!(sunrises.len(), 1);
        assert!(sunrises[0].angle.is_some());

        // Polling again inside the tolerance does not re-fire.
        let report = engine.tick(rise_time + Duration::seconds(1));
        assert!(report
            .notifications
            .iter()
            .all(|n| n.label != "sunrise"));
    }

    #[test]
    fn solar_terms_are_cached_per_year() {
        let mut engine = engine();
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 5).unwrap();
        engine.tick(now);
        assert_eq!(engine.terms.year(), 2026);
        assert_eq!(engine.terms.terms().len(), 24);

        let calls_after_first = engine.model.calls.get();
        engine.tick(now + Duration::seconds(60));
        // The minutely recomputation did not rebuild the year calendar:
        // only a handful of calls for positions and phase, not the
        // ~400-sample yearly scan.
        assert!(engine.model.calls.get() - calls_after_first < 100);
    }

    #[test]
    fn snapshot_reports_lighting() {
        let mut engine = engine();
        let noon = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
        engine.apply_fix(fix(), noon);
        engine.tick(noon);

        let snapshot = engine.snapshot().unwrap();
        // The sine sky peaks at 12:00 UTC: full daylight.
        assert_eq!(snapshot.lighting(), Some(LightingStage::Day));
    }
}
