//! Degree wrapping and separation over a circular domain.
//!
//! Every search in the almanac layer runs over angles that wrap at 360°:
//! azimuths, sidereal angles, and above all the sun's ecliptic longitude,
//! whose 360°→0° discontinuity sits in the middle of the solar-term year.
//! These helpers keep that wrap handling in one place.
//!
//! # Quick Start
//!
//! ```
//! use pelorus_core::angle::{wrap_to_360, signed_separation};
//!
//! assert_eq!(wrap_to_360(370.0), 10.0);
//! assert_eq!(wrap_to_360(-10.0), 350.0);
//!
//! // Shortest signed arc from 350° to 10° is +20°, not -340°.
//! assert_eq!(signed_separation(10.0, 350.0), 20.0);
//! ```

use libm::fmod;

/// Wraps an angle in degrees to the range [0, 360).
#[inline]
pub fn wrap_to_360(degrees: f64) -> f64 {
    let wrapped = fmod(degrees, 360.0);
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Shortest signed arc from `from` to `to`, in degrees, in (-180, 180].
///
/// Positive when `to` lies counterclockwise (increasing angle) of `from`
/// along the shorter way around the circle.
#[inline]
pub fn signed_separation(to: f64, from: f64) -> f64 {
    let mut diff = fmod(to - from, 360.0);
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff <= -180.0 {
        diff += 360.0;
    }
    diff
}

/// Formats an azimuth as a zero-padded whole-degree bearing, e.g. `002°`.
pub fn format_bearing(degrees: f64) -> String {
    let rounded = wrap_to_360(degrees).round() as u32 % 360;
    format!("{:03}°", rounded)
}
