//! Lighting stage from solar altitude.
//!
//! The standard twilight bands: civil, nautical and astronomical twilight
//! end at solar altitudes of -6°, -12° and -18°.

/// Daylight classification for the current solar altitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingStage {
    Day,
    CivilTwilight,
    NauticalTwilight,
    AstronomicalTwilight,
    Night,
}

impl LightingStage {
    pub fn from_solar_altitude(altitude: f64) -> Self {
        if altitude <= -18.0 {
            Self::Night
        } else if altitude <= -12.0 {
            Self::AstronomicalTwilight
        } else if altitude <= -6.0 {
            Self::NauticalTwilight
        } else if altitude <= 0.0 {
            Self::CivilTwilight
        } else {
            Self::Day
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::CivilTwilight => "civil twilight",
            Self::NauticalTwilight => "nautical twilight",
            Self::AstronomicalTwilight => "astronomical twilight",
            Self::Night => "night",
        }
    }

    /// One-line watchkeeping description of what this stage looks like.
    pub fn description(self) -> &'static str {
        match self {
            Self::Day => "full daylight, horizon sharp",
            Self::CivilTwilight => "bright horizon, deck work without lights",
            Self::NauticalTwilight => "horizon visible for sextant work, stars out",
            Self::AstronomicalTwilight => "horizon gone, sky not yet fully dark",
            Self::Night => "fully dark, best star visibility",
        }
    }
}
