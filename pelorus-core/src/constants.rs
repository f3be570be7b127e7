//! Epochs and unit conversions shared across the workspace.

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00:00 TT).
pub const J2000_JD: f64 = 2451545.0;

/// Julian Date of the Unix epoch (1970-01-01 00:00:00 UTC).
pub const UNIX_EPOCH_JD: f64 = 2440587.5;

/// Julian Date of MJD 0 (1858-11-17 00:00:00).
pub const MJD_ZERO_POINT: f64 = 2400000.5;

/// Seconds in one mean solar day.
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Days in one Julian century.
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;

/// One astronomical unit in kilometers (IAU 2012 definition).
pub const AU_KM: f64 = 149_597_870.7;

/// Semi-major axis of the WGS84 ellipsoid in kilometers (defining parameter).
pub const WGS84_A_KM: f64 = 6378.137;

/// First eccentricity squared of the WGS84 ellipsoid.
///
/// Pre-computed from flattening f = 1/298.257223563: e² = 2f − f².
pub const WGS84_E2: f64 = 6.694379990141316e-3;

/// TT − UTC in seconds for the current leap-second era.
///
/// 32.184 s (TT − TAI) plus the 37 leap seconds in force since 2017.
/// Treated as constant; the drift is milliseconds over the supported
/// observation window.
pub const TT_MINUS_UTC_SECONDS: f64 = 69.184;
