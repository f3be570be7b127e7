//! Rise, set and meridian transit within one local calendar day.
//!
//! The day window is the observer's local [00:00:00, 23:59:59] converted
//! to UTC. Horizon crossings are found by sampling the "above horizon"
//! step function and bisecting each bracketing interval; the transit is a
//! plain coarse maximum scan, since altitude over a day is smooth and
//! single-peaked for the sun and moon.
//!
//! Circumpolar days report [`HorizonCrossings::AlwaysUp`] /
//! [`HorizonCrossings::AlwaysDown`]: computed outcomes, distinct from
//! computation errors. The classification samples altitude at local noon
//! and local midnight only; near-threshold latitude/date combinations can
//! be misclassified by it. Known approximation, kept for its simplicity.

use crate::errors::{AlmanacError, AlmanacResult};
use crate::model::SkyModel;
use crate::search::{bisect_crossing, DEFAULT_TOLERANCE};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use pelorus_core::{LocalClock, Observer};
use pelorus_ephemeris::Body;

/// Stride of the horizon-crossing scan, minutes. Ten minutes cannot skip
/// a sun or moon crossing except for grazing double-crossings at extreme
/// latitudes, which the day window reports as circumpolar anyway.
const CROSSING_STEP_MINUTES: i64 = 10;

/// Stride of the transit maximum scan, minutes.
const TRANSIT_STEP_MINUTES: i64 = 2;

/// A refined horizon crossing: the instant and the azimuth there.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventInstant {
    pub time: DateTime<Utc>,
    pub azimuth: f64,
}

/// The daily altitude maximum: the instant and the altitude there.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitInstant {
    pub time: DateTime<Utc>,
    pub altitude: f64,
}

/// Horizon-crossing outcome for one body and day.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HorizonCrossings {
    /// The ordinary case. Either crossing may still be absent when only
    /// one of rise/set falls inside the day window.
    Normal {
        rise: Option<EventInstant>,
        set: Option<EventInstant>,
    },
    /// Above the horizon for the whole day (polar day).
    AlwaysUp,
    /// Below the horizon for the whole day (polar night).
    AlwaysDown,
}

/// Everything the engine wants to know about one body's day.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayReport {
    pub crossings: HorizonCrossings,
    pub transit: TransitInstant,
}

/// Searches one local calendar day for rise, set and transit.
///
/// Only the first rise and first set inside the window are reported.
///
/// # Errors
///
/// Propagates `Unavailable` from the model and reports `Computation` when
/// the circumpolar classification is inconsistent with the scan (no
/// crossing found, but noon and midnight altitudes disagree in sign).
pub fn day_report<M: SkyModel>(
    model: &M,
    body: Body,
    observer: &Observer,
    date: NaiveDate,
    clock: &LocalClock,
) -> AlmanacResult<DayReport> {
    let (window_start, window_end) = clock.day_bounds_utc(date);

    let altitude =
        |t: DateTime<Utc>| -> AlmanacResult<f64> { Ok(model.apparent(body, t, observer)?.altitude) };

    let mut rise = None;
    let mut set = None;

    let step = Duration::minutes(CROSSING_STEP_MINUTES);
    let mut prev_t = window_start;
    let mut prev_alt = altitude(prev_t)?;
    let mut t = window_start;
    while t < window_end {
        t = (t + step).min(window_end);
        let alt = altitude(t)?;

        if rise.is_none() && prev_alt < 0.0 && alt >= 0.0 {
            let instant = bisect_crossing(prev_t, t, altitude, DEFAULT_TOLERANCE)?;
            let azimuth = model.apparent(body, instant, observer)?.azimuth;
            rise = Some(EventInstant {
                time: instant,
                azimuth,
            });
        }
        if set.is_none() && prev_alt >= 0.0 && alt < 0.0 {
            let instant =
                bisect_crossing(prev_t, t, |t| altitude(t).map(|a| -a), DEFAULT_TOLERANCE)?;
            let azimuth = model.apparent(body, instant, observer)?.azimuth;
            set = Some(EventInstant {
                time: instant,
                azimuth,
            });
        }

        prev_t = t;
        prev_alt = alt;
    }

    let transit = find_transit(model, body, observer, window_start, window_end)?;

    let crossings = if rise.is_none() && set.is_none() {
        classify_circumpolar(model, body, observer, date, clock)?
    } else {
        HorizonCrossings::Normal { rise, set }
    };

    Ok(DayReport { crossings, transit })
}

/// Coarse global-maximum scan for the meridian transit.
fn find_transit<M: SkyModel>(
    model: &M,
    body: Body,
    observer: &Observer,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> AlmanacResult<TransitInstant> {
    let mut best = TransitInstant {
        time: window_start,
        altitude: f64::NEG_INFINITY,
    };

    let step = Duration::minutes(TRANSIT_STEP_MINUTES);
    let mut t = window_start;
    loop {
        let altitude = model.apparent(body, t, observer)?.altitude;
        if altitude > best.altitude {
            best = TransitInstant { time: t, altitude };
        }
        if t >= window_end {
            break;
        }
        t = (t + step).min(window_end);
    }

    Ok(best)
}

fn classify_circumpolar<M: SkyModel>(
    model: &M,
    body: Body,
    observer: &Observer,
    date: NaiveDate,
    clock: &LocalClock,
) -> AlmanacResult<HorizonCrossings> {
    let noon = model
        .apparent(body, clock.local_noon_utc(date), observer)?
        .altitude;
    let midnight = model
        .apparent(body, clock.local_midnight_utc(date), observer)?
        .altitude;

    if noon > 0.0 && midnight > 0.0 {
        Ok(HorizonCrossings::AlwaysUp)
    } else if noon < 0.0 && midnight < 0.0 {
        Ok(HorizonCrossings::AlwaysDown)
    } else {
        Err(AlmanacError::Computation(format!(
            "no horizon crossing found, but noon/midnight altitudes disagree \
             ({noon:.2}°, {midnight:.2}°)"
        )))
    }
}
