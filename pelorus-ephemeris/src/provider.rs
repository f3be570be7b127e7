//! The [`Ephemeris`] facade: body positions for one observer and instant.

use crate::errors::{EphemerisError, EphemerisResult, SpkError};
use crate::frames;
use crate::kernel::{self, SpkKernel};
use chrono::{DateTime, Utc};
use pelorus_core::angle::wrap_to_360;
use pelorus_core::constants::{AU_KM, SECONDS_PER_DAY, TT_MINUS_UTC_SECONDS};
use pelorus_core::{JulianDate, Observer};
use std::path::Path;

/// Annual aberration displaces the apparent sun about 20.5″ backward
/// along the ecliptic.
const SOLAR_ABERRATION_DEGREES: f64 = 0.005_69;

/// The two bodies this engine tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Body {
    Sun,
    Moon,
}

impl Body {
    pub fn naif_id(self) -> i32 {
        match self {
            Body::Sun => kernel::SUN,
            Body::Moon => kernel::MOON,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
        }
    }
}

/// Apparent place of a body for one (time, observer) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizontal {
    /// Altitude above the geometric horizon, degrees, [-90, 90].
    pub altitude: f64,
    /// Azimuth from north through east, degrees, [0, 360).
    pub azimuth: f64,
    /// Geocentric ecliptic longitude of date, degrees, [0, 360).
    pub ecliptic_longitude: f64,
    /// Topocentric distance in astronomical units.
    pub distance_au: f64,
}

/// Ephemeris provider backed by an SPK kernel.
///
/// Construct with [`Ephemeris::load`]; if the kernel cannot be read at
/// startup, fall back to [`Ephemeris::unavailable`] so downstream
/// components receive a uniform [`EphemerisError::Unavailable`] instead of
/// a crash.
pub struct Ephemeris {
    kernel: Option<SpkKernel>,
}

impl Ephemeris {
    /// Opens the kernel file and builds a live provider.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpkError> {
        let kernel = SpkKernel::open(path)?;
        Ok(Self {
            kernel: Some(kernel),
        })
    }

    /// A provider whose every query reports [`EphemerisError::Unavailable`].
    pub fn unavailable() -> Self {
        Self { kernel: None }
    }

    pub fn is_available(&self) -> bool {
        self.kernel.is_some()
    }

    fn kernel(&self) -> EphemerisResult<&SpkKernel> {
        self.kernel.as_ref().ok_or(EphemerisError::Unavailable)
    }

    /// Geocentric position in km on ICRF axes.
    pub fn geocentric(&self, body: Body, t: DateTime<Utc>) -> EphemerisResult<[f64; 3]> {
        let et = et_seconds(t);
        Ok(self.kernel()?.geocentric_position(body.naif_id(), et)?)
    }

    /// Geocentric ecliptic longitude of date, degrees in [0, 360).
    pub fn ecliptic_longitude(&self, body: Body, t: DateTime<Utc>) -> EphemerisResult<f64> {
        let geocentric = self.geocentric(body, t)?;
        let centuries = tt_julian_date(t).centuries_since_j2000();
        let mut lon = frames::ecliptic_longitude_of_date(&geocentric, centuries);
        if body == Body::Sun {
            lon = wrap_to_360(lon - SOLAR_ABERRATION_DEGREES);
        }
        Ok(lon)
    }

    /// Apparent altitude/azimuth (plus longitude and distance) for an
    /// observer.
    pub fn apparent(
        &self,
        body: Body,
        t: DateTime<Utc>,
        observer: &Observer,
    ) -> EphemerisResult<Horizontal> {
        let geocentric = self.geocentric(body, t)?;
        let centuries = tt_julian_date(t).centuries_since_j2000();

        // Precess to the mean equator of date, then shift to the observer.
        let precession = frames::precession_matrix(centuries);
        let of_date = frames::rotate(&precession, &geocentric);

        let jd_ut = JulianDate::from_datetime(t);
        let gmst = frames::gmst_degrees(&jd_ut);
        let site = frames::observer_equatorial_km(observer, gmst);
        let topocentric = [
            of_date[0] - site[0],
            of_date[1] - site[1],
            of_date[2] - site[2],
        ];

        let (ra, dec) = frames::radec_degrees(&topocentric);
        let lst = wrap_to_360(gmst + observer.longitude);
        let hour_angle = wrap_to_360(lst - ra);
        let (altitude, azimuth) = frames::horizontal_degrees(observer.latitude, hour_angle, dec);

        let mut ecliptic_longitude = frames::ecliptic_longitude_of_date(&geocentric, centuries);
        if body == Body::Sun {
            ecliptic_longitude = wrap_to_360(ecliptic_longitude - SOLAR_ABERRATION_DEGREES);
        }

        Ok(Horizontal {
            altitude,
            azimuth,
            ecliptic_longitude,
            distance_au: frames::norm(&topocentric) / AU_KM,
        })
    }
}

/// ET (TDB) seconds past J2000 for a UTC instant.
///
/// Uses the fixed TT−UTC offset of the current leap-second era; the
/// periodic TDB−TT terms (< 2 ms) are ignored.
pub fn et_seconds(t: DateTime<Utc>) -> f64 {
    JulianDate::from_datetime(t).days_since_j2000() * SECONDS_PER_DAY + TT_MINUS_UTC_SECONDS
}

/// TT expressed as a Julian Date for a UTC instant.
fn tt_julian_date(t: DateTime<Utc>) -> JulianDate {
    JulianDate::from_datetime(t).add_seconds(TT_MINUS_UTC_SECONDS)
}
