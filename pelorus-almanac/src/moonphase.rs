//! Moon phase, illumination and synodic age.
//!
//! Two different angles describe the phase and both are needed. The
//! *phase angle* (sun–earth–moon) gives the illuminated fraction, but it
//! is symmetric: a week before and a week after full moon look identical.
//! The *longitude difference* `(λ_moon − λ_sun) mod 360` is monotonic
//! through the cycle, so its ratio over the circle drives the 8-bucket
//! classification and the waxing/waning trend.

use crate::errors::AlmanacResult;
use crate::model::SkyModel;
use chrono::{DateTime, Utc};
use pelorus_core::angle::wrap_to_360;
use pelorus_ephemeris::frames::{dot, norm};
use pelorus_ephemeris::Body;

/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530588;

/// Whether the illuminated fraction is growing or shrinking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trend {
    Waxing,
    Waning,
    /// Exactly at the full-moon ratio of 0.5.
    Steady,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Waxing => "↑",
            Trend::Waning => "↓",
            Trend::Steady => "—",
        }
    }
}

/// Discrete phase, bucketed by the longitude-difference ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseBucket {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl PhaseBucket {
    /// Buckets a ratio in [0, 1). The eight intervals partition the
    /// cycle with the cardinal phases centered on their nominal ratios.
    pub fn from_ratio(ratio: f64) -> Self {
        match ratio {
            r if r < 0.0625 => Self::New,
            r if r < 0.1875 => Self::WaxingCrescent,
            r if r < 0.3125 => Self::FirstQuarter,
            r if r < 0.4375 => Self::WaxingGibbous,
            r if r < 0.5625 => Self::Full,
            r if r < 0.6875 => Self::WaningGibbous,
            r if r < 0.8125 => Self::LastQuarter,
            r if r < 0.9375 => Self::WaningCrescent,
            _ => Self::New,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::New => "new moon",
            Self::WaxingCrescent => "waxing crescent",
            Self::FirstQuarter => "first quarter",
            Self::WaxingGibbous => "waxing gibbous",
            Self::Full => "full moon",
            Self::WaningGibbous => "waning gibbous",
            Self::LastQuarter => "last quarter",
            Self::WaningCrescent => "waning crescent",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::New => "🌑",
            Self::WaxingCrescent => "🌒",
            Self::FirstQuarter => "🌓",
            Self::WaxingGibbous => "🌔",
            Self::Full => "🌕",
            Self::WaningGibbous => "🌖",
            Self::LastQuarter => "🌗",
            Self::WaningCrescent => "🌘",
        }
    }

    /// Which limb is lit, northern-hemisphere view.
    pub fn lit_side(self) -> &'static str {
        match self {
            Self::New => "not visible",
            Self::WaxingCrescent | Self::FirstQuarter | Self::WaxingGibbous => "right limb lit",
            Self::Full => "fully lit",
            Self::WaningGibbous | Self::LastQuarter | Self::WaningCrescent => "left limb lit",
        }
    }
}

/// Full phase description at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoonPhase {
    /// Sun–earth–moon angle in degrees, [0, 180].
    pub phase_angle: f64,
    /// Longitude-difference ratio in [0, 1); 0 = new, 0.5 = full.
    pub ratio: f64,
    /// Synodic age in days.
    pub age_days: f64,
    /// Illuminated fraction in percent.
    pub illumination: f64,
    pub bucket: PhaseBucket,
    pub trend: Trend,
}

/// Computes the phase description for one instant.
pub fn compute<M: SkyModel>(model: &M, t: DateTime<Utc>) -> AlmanacResult<MoonPhase> {
    let sun = model.geocentric(Body::Sun, t)?;
    let moon = model.geocentric(Body::Moon, t)?;

    let cos_phase =
        (dot(&sun, &moon) / (norm(&sun) * norm(&moon) + 1e-15)).clamp(-1.0, 1.0);
    let phase_angle = cos_phase.acos().to_degrees();

    let sun_longitude = model.ecliptic_longitude(Body::Sun, t)?;
    let moon_longitude = model.ecliptic_longitude(Body::Moon, t)?;
    let ratio = wrap_to_360(moon_longitude - sun_longitude) / 360.0;

    let trend = if ratio < 0.5 {
        Trend::Waxing
    } else if ratio > 0.5 {
        Trend::Waning
    } else {
        Trend::Steady
    };

    Ok(MoonPhase {
        phase_angle,
        ratio,
        age_days: ratio * SYNODIC_MONTH_DAYS,
        illumination: 50.0 * (1.0 - phase_angle.to_radians().cos()),
        bucket: PhaseBucket::from_ratio(ratio),
        trend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pelorus_core::Observer;
    use pelorus_ephemeris::Horizontal;

    /// Sun fixed at longitude 0; moon placed at a chosen elongation in
    /// the ecliptic plane.
    struct Elongation(f64);

    impl SkyModel for Elongation {
        fn apparent(
            &self,
            _body: Body,
            _t: DateTime<Utc>,
            _observer: &Observer,
        ) -> AlmanacResult<Horizontal> {
            unreachable!("phase computation never asks for apparent places")
        }

        fn ecliptic_longitude(&self, body: Body, _t: DateTime<Utc>) -> AlmanacResult<f64> {
            Ok(match body {
                Body::Sun => 0.0,
                Body::Moon => self.0,
            })
        }

        fn geocentric(&self, body: Body, _t: DateTime<Utc>) -> AlmanacResult<[f64; 3]> {
            Ok(match body {
                Body::Sun => [1.496e8, 0.0, 0.0],
                Body::Moon => {
                    let (sin, cos) = self.0.to_radians().sin_cos();
                    [384_400.0 * cos, 384_400.0 * sin, 0.0]
                }
            })
        }
    }

    fn t() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 0, 0, 0).unwrap()
    }

    #[test]
    fn new_moon_is_dark() {
        let phase = compute(&Elongation(0.0), t()).unwrap();
        assert!(phase.phase_angle.abs() < 1e-9);
        assert!(phase.illumination.abs() < 1e-9);
        assert_eq!(phase.bucket, PhaseBucket::New);
        assert_eq!(phase.trend, Trend::Waxing);
        assert!(phase.age_days.abs() < 1e-9);
    }

    #[test]
    fn full_moon_is_lit() {
        let phase = compute(&Elongation(180.0), t()).unwrap();
        assert!((phase.phase_angle - 180.0).abs() < 1e-9);
        assert!((phase.illumination - 100.0).abs() < 1e-9);
        assert_eq!(phase.bucket, PhaseBucket::Full);
        assert_eq!(phase.trend, Trend::Steady);
    }

    #[test]
    fn quarters_share_the_phase_angle_but_not_the_bucket() {
        // The phase angle is 90° at both quarters; only the ratio tells
        // them apart.
        let first = compute(&Elongation(90.0), t()).unwrap();
        let last = compute(&Elongation(270.0), t()).unwrap();

        assert!((first.phase_angle - 90.0).abs() < 1e-9);
        assert!((last.phase_angle - 90.0).abs() < 1e-9);
        assert!((first.illumination - 50.0).abs() < 1e-9);
        assert!((last.illumination - 50.0).abs() < 1e-9);

        assert_eq!(first.bucket, PhaseBucket::FirstQuarter);
        assert_eq!(first.trend, Trend::Waxing);
        assert_eq!(last.bucket, PhaseBucket::LastQuarter);
        assert_eq!(last.trend, Trend::Waning);
    }

    #[test]
    fn age_scales_with_ratio() {
        let phase = compute(&Elongation(90.0), t()).unwrap();
        assert!((phase.age_days - SYNODIC_MONTH_DAYS / 4.0).abs() < 1e-9);
    }

    #[test]
    fn buckets_partition_the_cycle() {
        // Walk the ratio domain finely: every value lands in exactly one
        // bucket (total function) and bucket transitions happen only at
        // the specified thresholds.
        let thresholds = [
            0.0625, 0.1875, 0.3125, 0.4375, 0.5625, 0.6875, 0.8125, 0.9375,
        ];
        let mut previous = PhaseBucket::from_ratio(0.0);
        let mut transitions = Vec::new();
        let steps = 100_000;
        for i in 1..steps {
            let ratio = i as f64 / steps as f64;
            let bucket = PhaseBucket::from_ratio(ratio);
            if bucket != previous {
                transitions.push(ratio);
                previous = bucket;
            }
        }
        assert_eq!(transitions.len(), thresholds.len());
        for (found, expected) in transitions.iter().zip(thresholds) {
            assert!(
                (found - expected).abs() <= 1.0 / steps as f64,
                "transition at {found}, expected {expected}"
            );
        }
    }

    #[test]
    fn boundary_ratios() {
        assert_eq!(PhaseBucket::from_ratio(0.0625), PhaseBucket::WaxingCrescent);
        assert_eq!(PhaseBucket::from_ratio(0.4375), PhaseBucket::Full);
        assert_eq!(PhaseBucket::from_ratio(0.9375), PhaseBucket::New);
    }

    #[test]
    fn glyph_and_name_cover_all_buckets() {
        for ratio in [0.0, 0.1, 0.25, 0.4, 0.5, 0.6, 0.75, 0.9] {
            let bucket = PhaseBucket::from_ratio(ratio);
            assert!(!bucket.name().is_empty());
            assert!(!bucket.glyph().is_empty());
            assert!(!bucket.lit_side().is_empty());
        }
    }
}
