//! Frame reductions: sidereal time, precession, horizon coordinates.
//!
//! The kernel hands out vectors on ICRF (J2000 equatorial) axes. Getting
//! from there to what an observer sees takes three steps: precess to the
//! mean equator and equinox of date (IAU 1976 angles), rotate the
//! observer's WGS84 position into the same frame with Greenwich mean
//! sidereal time, and convert the topocentric difference vector to
//! altitude/azimuth through the hour angle. Nutation is left out; at a
//! few arcseconds it is noise against this engine's accuracy envelope.

use pelorus_core::angle::wrap_to_360;
use pelorus_core::constants::{WGS84_A_KM, WGS84_E2};
use pelorus_core::{JulianDate, Observer};

/// Greenwich mean sidereal time in degrees for a UT instant.
///
/// Linear expression in days from J2000 (Meeus ch. 12); the omitted
/// centennial terms are below a tenth of an arcsecond per century.
pub fn gmst_degrees(jd_ut: &JulianDate) -> f64 {
    let d = jd_ut.days_since_j2000();
    wrap_to_360(280.460_618_37 + 360.985_647_366_29 * d)
}

/// Mean obliquity of the ecliptic in degrees at `t` Julian centuries
/// past J2000.
pub fn mean_obliquity_degrees(t: f64) -> f64 {
    23.439_291_111 - (46.8150 * t + 0.00059 * t * t - 0.001813 * t * t * t) / 3600.0
}

/// Accumulated general precession in ecliptic longitude, degrees, at `t`
/// Julian centuries past J2000.
pub fn general_precession_degrees(t: f64) -> f64 {
    (5028.796_195 * t + 1.105_434_8 * t * t) / 3600.0
}

/// IAU 1976 precession matrix taking J2000 equatorial vectors to the mean
/// equator and equinox of date.
pub fn precession_matrix(t: f64) -> [[f64; 3]; 3] {
    let arcsec = |v: f64| (v / 3600.0).to_radians();
    let zeta = arcsec(2306.2181 * t + 0.30188 * t * t + 0.017998 * t * t * t);
    let z = arcsec(2306.2181 * t + 1.09468 * t * t + 0.018203 * t * t * t);
    let theta = arcsec(2004.3109 * t - 0.42665 * t * t - 0.041833 * t * t * t);

    // P = R3(-z) · R2(theta) · R3(-zeta)
    let (sin_zeta, cos_zeta) = zeta.sin_cos();
    let (sin_z, cos_z) = z.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    [
        [
            cos_zeta * cos_theta * cos_z - sin_zeta * sin_z,
            -sin_zeta * cos_theta * cos_z - cos_zeta * sin_z,
            -sin_theta * cos_z,
        ],
        [
            cos_zeta * cos_theta * sin_z + sin_zeta * cos_z,
            -sin_zeta * cos_theta * sin_z + cos_zeta * cos_z,
            -sin_theta * sin_z,
        ],
        [
            cos_zeta * sin_theta,
            -sin_zeta * sin_theta,
            cos_theta,
        ],
    ]
}

/// Applies a 3×3 rotation to a vector.
pub fn rotate(m: &[[f64; 3]; 3], v: &[f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

pub fn norm(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Observer position on the mean equator of date, in km.
///
/// WGS84 geodetic coordinates at sea level, rotated from earth-fixed to
/// celestial axes by GMST.
pub fn observer_equatorial_km(observer: &Observer, gmst_deg: f64) -> [f64; 3] {
    let lat = observer.latitude_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();

    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let xy = n * cos_lat;
    let z = n * (1.0 - WGS84_E2) * sin_lat;

    // Local sidereal angle of the observer's meridian.
    let theta = (gmst_deg + observer.longitude).to_radians();
    let (sin_theta, cos_theta) = theta.sin_cos();

    [xy * cos_theta, xy * sin_theta, z]
}

/// Right ascension and declination, in degrees, of an equatorial vector.
pub fn radec_degrees(v: &[f64; 3]) -> (f64, f64) {
    let ra = wrap_to_360(v[1].atan2(v[0]).to_degrees());
    let dec = (v[2] / norm(v)).asin().to_degrees();
    (ra, dec)
}

/// Altitude and azimuth, in degrees, from latitude, hour angle and
/// declination. Azimuth is measured from north through east, in [0, 360).
pub fn horizontal_degrees(lat_deg: f64, hour_angle_deg: f64, dec_deg: f64) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let ha = hour_angle_deg.to_radians();
    let dec = dec_deg.to_radians();

    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_ha, cos_ha) = ha.sin_cos();
    let (sin_dec, cos_dec) = dec.sin_cos();

    let altitude = (sin_lat * sin_dec + cos_lat * cos_dec * cos_ha).asin();
    let azimuth = (-sin_ha * cos_dec).atan2(sin_dec * cos_lat - cos_dec * sin_lat * cos_ha);

    (altitude.to_degrees(), wrap_to_360(azimuth.to_degrees()))
}

/// Ecliptic longitude of date, in degrees [0, 360), of a J2000 equatorial
/// vector.
pub fn ecliptic_longitude_of_date(v_j2000: &[f64; 3], t: f64) -> f64 {
    let p = precession_matrix(t);
    let v = rotate(&p, v_j2000);

    let eps = mean_obliquity_degrees(t).to_radians();
    let (sin_eps, cos_eps) = eps.sin_cos();
    let x_ecl = v[0];
    let y_ecl = v[1] * cos_eps + v[2] * sin_eps;

    wrap_to_360(y_ecl.atan2(x_ecl).to_degrees())
}
