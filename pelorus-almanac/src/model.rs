//! The seam between searches and the ephemeris.
//!
//! Every search in this crate is written against [`SkyModel`] rather than
//! the concrete provider, so tests can drive the bracketing and bisection
//! logic with analytic models (a sinusoidal "sun", a linearly advancing
//! longitude) where every expected answer is known in closed form.

use crate::errors::AlmanacResult;
use chrono::{DateTime, Utc};
use pelorus_core::Observer;
use pelorus_ephemeris::{Body, Ephemeris, Horizontal};

/// Positions the almanac searches need, for sun or moon.
pub trait SkyModel {
    /// Apparent place for an observer: altitude, azimuth, ecliptic
    /// longitude of date, distance.
    fn apparent(
        &self,
        body: Body,
        t: DateTime<Utc>,
        observer: &Observer,
    ) -> AlmanacResult<Horizontal>;

    /// Geocentric ecliptic longitude of date in degrees, [0, 360).
    fn ecliptic_longitude(&self, body: Body, t: DateTime<Utc>) -> AlmanacResult<f64>;

    /// Geocentric position vector in km on ICRF axes.
    fn geocentric(&self, body: Body, t: DateTime<Utc>) -> AlmanacResult<[f64; 3]>;
}

impl SkyModel for Ephemeris {
    fn apparent(
        &self,
        body: Body,
        t: DateTime<Utc>,
        observer: &Observer,
    ) -> AlmanacResult<Horizontal> {
        Ok(Ephemeris::apparent(self, body, t, observer)?)
    }

    fn ecliptic_longitude(&self, body: Body, t: DateTime<Utc>) -> AlmanacResult<f64> {
        Ok(Ephemeris::ecliptic_longitude(self, body, t)?)
    }

    fn geocentric(&self, body: Body, t: DateTime<Utc>) -> AlmanacResult<[f64; 3]> {
        Ok(Ephemeris::geocentric(self, body, t)?)
    }
}
