//! The 24 solar terms: yearly solar-longitude crossing instants.
//!
//! A solar term is the instant the sun's apparent ecliptic longitude
//! crosses one of 24 fixed values 15° apart, beginning the cycle at 315°.
//! Finding them is a two-stage search: a coarse once-per-day scan of the
//! longitude (noon UTC, spanning one month beyond the year on each side)
//! brackets each crossing, and the shared bisection primitive pins the
//! instant down to 0.0001° of the target.
//!
//! The scan has to respect the 360°→0° wrap: a day pair like
//! 359.7°→0.6° crosses only the targets at the top of the circle, which
//! an unwrapped interval test would miss entirely.
//!
//! Results live in a [`SolarTermCalendar`], an explicit cache keyed by
//! year, owned by whoever drives the engine and recomputed only when the
//! observed calendar year changes.

use crate::errors::AlmanacResult;
use crate::model::SkyModel;
use crate::search::{bisect_crossing, DEFAULT_TOLERANCE};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use pelorus_core::angle::signed_separation;
use pelorus_core::LocalClock;
use pelorus_ephemeris::Body;

/// Target longitudes and names, in cycle order starting at 315°.
pub const SOLAR_TERMS: [(f64, &str); 24] = [
    (315.0, "Start of Spring"),
    (330.0, "Rain Water"),
    (345.0, "Awakening of Insects"),
    (0.0, "Spring Equinox"),
    (15.0, "Clear and Bright"),
    (30.0, "Grain Rain"),
    (45.0, "Start of Summer"),
    (60.0, "Grain Full"),
    (75.0, "Grain in Ear"),
    (90.0, "Summer Solstice"),
    (105.0, "Minor Heat"),
    (120.0, "Major Heat"),
    (135.0, "Start of Autumn"),
    (150.0, "End of Heat"),
    (165.0, "White Dew"),
    (180.0, "Autumn Equinox"),
    (195.0, "Cold Dew"),
    (210.0, "Frost Descent"),
    (225.0, "Start of Winter"),
    (240.0, "Minor Snow"),
    (255.0, "Major Snow"),
    (270.0, "Winter Solstice"),
    (285.0, "Minor Cold"),
    (300.0, "Major Cold"),
];

/// Days a term may lie ahead and still be worth a reminder.
const REMINDER_HORIZON_DAYS: i64 = 30;

/// One refined solar-term instant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolarTerm {
    pub name: &'static str,
    /// The crossed target longitude in degrees.
    pub longitude: f64,
    pub instant: DateTime<Utc>,
}

/// The per-year solar-term cache.
#[derive(Debug, Clone)]
pub struct SolarTermCalendar {
    year: i32,
    terms: Vec<SolarTerm>,
}

impl SolarTermCalendar {
    /// Computes the full term list for one calendar year.
    pub fn compute<M: SkyModel>(model: &M, year: i32) -> AlmanacResult<Self> {
        let scan_start = first_of_month(year - 1, 12);
        let scan_end = first_of_month(year + 1, 2);

        let mut terms: Vec<SolarTerm> = Vec::with_capacity(SOLAR_TERMS.len());
        let mut prev: Option<(DateTime<Utc>, f64)> = None;

        let mut day = scan_start;
        while day < scan_end {
            let noon = Utc
                .from_utc_datetime(&day.and_hms_opt(12, 0, 0).expect("noon is always valid"));
            let longitude = model.ecliptic_longitude(Body::Sun, noon)?;

            if let Some((prev_noon, prev_longitude)) = prev {
                for &(target, name) in &SOLAR_TERMS {
                    if terms.iter().any(|t| t.name == name) {
                        continue;
                    }
                    if !crossed(prev_longitude, longitude, target) {
                        continue;
                    }

                    let instant = bisect_crossing(
                        prev_noon,
                        noon,
                        |t| {
                            model
                                .ecliptic_longitude(Body::Sun, t)
                                .map(|lon| signed_separation(lon, target))
                        },
                        DEFAULT_TOLERANCE,
                    )?;

                    // The scan buffer reaches into the neighboring years;
                    // only instants inside the requested year count.
                    if instant.year() == year {
                        terms.push(SolarTerm {
                            name,
                            longitude: target,
                            instant,
                        });
                    }
                }
            }

            prev = Some((noon, longitude));
            day += Duration::days(1);
        }

        terms.sort_by_key(|t| t.instant);
        Ok(Self { year, terms })
    }

    /// An empty placeholder for engines that have not computed a year yet.
    pub fn empty() -> Self {
        Self {
            year: i32::MIN,
            terms: Vec::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn terms(&self) -> &[SolarTerm] {
        &self.terms
    }

    /// Recomputes only when the observed year differs from the cached one.
    ///
    /// Returns whether a recomputation happened.
    pub fn refresh<M: SkyModel>(&mut self, model: &M, year: i32) -> AlmanacResult<bool> {
        if self.year == year {
            return Ok(false);
        }
        *self = Self::compute(model, year)?;
        Ok(true)
    }

    /// The reminder line for a given local date, if any term is upcoming.
    ///
    /// Today and tomorrow take priority over the within-horizon form;
    /// at most one reminder is produced.
    pub fn reminder(&self, today: NaiveDate, clock: &LocalClock) -> Option<String> {
        for term in &self.terms {
            let local = clock.to_local(term.instant);
            let days_ahead = (local.date() - today).num_days();
            if days_ahead < 0 {
                continue;
            }
            return match days_ahead {
                0 => Some(format!(
                    "Solar term today: {} at {}",
                    term.name,
                    local.format("%H:%M:%S")
                )),
                1 => Some(format!(
                    "Solar term tomorrow: {} at {}",
                    term.name,
                    local.format("%H:%M:%S")
                )),
                d if d <= REMINDER_HORIZON_DAYS => Some(format!(
                    "{} in {} days ({})",
                    term.name,
                    d,
                    local.format("%m-%d %H:%M")
                )),
                _ => None,
            };
        }
        None
    }
}

/// Whether `target` lies between consecutive daily longitude samples,
/// with the 360°→0° wrap handled specially.
fn crossed(prev: f64, current: f64, target: f64) -> bool {
    if prev > 350.0 && current < 10.0 {
        target >= 345.0 || target == 0.0
    } else if prev < current {
        prev <= target && target <= current
    } else {
        target >= prev || target <= current
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is always valid")
}
