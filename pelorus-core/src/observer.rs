//! Geographic observer position.
//!
//! The observer moves: fixes arrive from the navigation feed and replace
//! the whole value at once. Keeping the type `Copy` and validating on
//! construction means every calculator downstream can take a snapshot by
//! value and never observe a half-updated pair.
//!
//! # Coordinate conventions
//!
//! - **Latitude**: north positive, degrees, range [-90, 90]
//! - **Longitude**: east positive, degrees, range [-180, 180]

use crate::errors::{CoreError, CoreResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observer {
    /// Geodetic latitude in degrees. North is positive.
    pub latitude: f64,
    /// Longitude in degrees. East is positive.
    pub longitude: f64,
}

impl Observer {
    /// Creates an observer from coordinates in degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if either coordinate is non-finite or outside its
    /// valid range.
    pub fn from_degrees(latitude: f64, longitude: f64) -> CoreResult<Self> {
        if !latitude.is_finite() {
            return Err(CoreError::invalid_coordinate(
                "latitude",
                "must be finite",
            ));
        }
        if !longitude.is_finite() {
            return Err(CoreError::invalid_coordinate(
                "longitude",
                "must be finite",
            ));
        }
        if latitude.abs() > 90.0 {
            return Err(CoreError::invalid_coordinate(
                "latitude",
                format!("{latitude} outside [-90, 90]"),
            ));
        }
        if longitude.abs() > 180.0 {
            return Err(CoreError::invalid_coordinate(
                "longitude",
                format!("{longitude} outside [-180, 180]"),
            ));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude_radians(&self) -> f64 {
        self.latitude.to_radians()
    }

    pub fn longitude_radians(&self) -> f64 {
        self.longitude.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let obs = Observer::from_degrees(37.3873, -121.9724).unwrap();
        assert!((obs.latitude - 37.3873).abs() < 1e-12);
        assert!((obs.longitude + 121.9724).abs() < 1e-12);
    }

    #[test]
    fn test_poles_and_antimeridian_accepted() {
        assert!(Observer::from_degrees(90.0, 180.0).is_ok());
        assert!(Observer::from_degrees(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(Observer::from_degrees(90.01, 0.0).is_err());
        assert!(Observer::from_degrees(0.0, 180.01).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(Observer::from_degrees(f64::NAN, 0.0).is_err());
        assert!(Observer::from_degrees(0.0, f64::INFINITY).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let obs = Observer::from_degrees(19.8207, -155.4681).unwrap();
        let json = serde_json::to_string(&obs).unwrap();
        let back: Observer = serde_json::from_str(&json).unwrap();
        assert_eq!(obs, back);
    }
}
