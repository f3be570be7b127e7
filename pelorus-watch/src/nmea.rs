//! RMC sentence parsing.
//!
//! The feed delivers standard NMEA 0183 lines; only the recommended
//! minimum sentence (`$GPRMC` and friends) carries what this engine
//! needs. Anything malformed is dropped without comment (the position
//! simply does not update), so the parser returns an `Option` rather
//! than an error.

/// One decoded navigation fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    /// Latitude in decimal degrees, north positive.
    pub latitude: f64,
    /// Longitude in decimal degrees, east positive.
    pub longitude: f64,
    /// Speed over ground in knots.
    pub speed_knots: f64,
    /// Course over ground in degrees true.
    pub course: f64,
}

/// Parses one RMC sentence.
///
/// Field layout: tag, UTC time, status (`A` = active), latitude
/// `ddmm.mmmm`, N/S, longitude `dddmm.mmmm`, E/W, speed in knots, course
/// in degrees; trailing fields (date, variation, checksum) are ignored.
/// Any talker prefix is accepted (`$GPRMC`, `$GNRMC`, ...).
///
/// Returns `None` for a wrong tag, a non-active status, or any required
/// field that fails to parse.
pub fn parse_rmc(line: &str) -> Option<Fix> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() < 9 {
        return None;
    }

    let tag = fields[0];
    if tag.len() != 6 || !tag.starts_with('$') || !tag.ends_with("RMC") {
        return None;
    }
    if fields[2] != "A" {
        return None;
    }

    let latitude = decode_degrees_minutes(fields[3].parse().ok()?, fields[4] == "S");
    let longitude = decode_degrees_minutes(fields[5].parse().ok()?, fields[6] == "W");
    let speed_knots = fields[7].parse().ok()?;
    let course = fields[8].parse().ok()?;

    Some(Fix {
        latitude,
        longitude,
        speed_knots,
        course,
    })
}

/// Decodes the NMEA `dddmm.mmmm` packing into decimal degrees.
fn decode_degrees_minutes(raw: f64, negative_hemisphere: bool) -> f64 {
    let degrees = (raw / 100.0).trunc();
    let minutes = raw - degrees * 100.0;
    let decimal = degrees + minutes / 60.0;
    if negative_hemisphere {
        -decimal
    } else {
        decimal
    }
}
