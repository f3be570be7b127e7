//! SPK segment lookup and barycenter chaining.
//!
//! DE-class kernels store each body relative to some center: planets and
//! the sun around the solar-system barycenter (0), the moon and earth
//! around the earth-moon barycenter (3). [`SpkKernel::ssb_position`]
//! follows that center chain until it reaches the barycenter, so
//! geocentric vectors fall out as a difference of two chains regardless of
//! how a particular kernel is segmented.

use crate::chebyshev;
use crate::daf::{DafFile, SegmentSummary};
use crate::errors::{SpkError, SpkResult};
use std::path::Path;

/// NAIF id of the solar-system barycenter.
pub const SSB: i32 = 0;
/// NAIF id of the earth-moon barycenter.
pub const EARTH_MOON_BARYCENTER: i32 = 3;
/// NAIF id of the sun.
pub const SUN: i32 = 10;
/// NAIF id of the earth.
pub const EARTH: i32 = 399;
/// NAIF id of the moon.
pub const MOON: i32 = 301;

/// Trailer of a Type 2 segment: INIT, INTLEN, RSIZE, N.
const DIRECTORY_WORDS: usize = 4;

/// An opened SPK kernel with its segment index.
pub struct SpkKernel {
    daf: DafFile,
    segments: Vec<SegmentSummary>,
}

impl SpkKernel {
    /// Opens a kernel and indexes its segments.
    ///
    /// # Errors
    ///
    /// Fails on malformed containers or a kernel with no segments at all;
    /// unsupported segment types are tolerated here and rejected only if a
    /// query actually needs them.
    pub fn open(path: impl AsRef<Path>) -> SpkResult<Self> {
        let daf = DafFile::open(path)?;
        let segments = daf.summaries()?;
        if segments.is_empty() {
            return Err(SpkError::InvalidData("kernel contains no segments".into()));
        }
        Ok(Self { daf, segments })
    }

    /// Number of indexed segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Position of `target` relative to its segment's center, in km.
    ///
    /// `et` is ET (TDB) seconds past J2000. Returns the segment's center id
    /// alongside the vector so callers can continue the chain.
    fn segment_position(&self, target: i32, et: f64) -> SpkResult<([f64; 3], i32)> {
        let segment = self
            .segments
            .iter()
            .find(|s| s.target == target && et >= s.start_et && et <= s.end_et)
            .copied()
            .or_else(|| {
                // Distinguish "no such body" from "no coverage at et".
                self.segments.iter().find(|s| s.target == target).copied()
            })
            .ok_or(SpkError::MissingSegment { target })?;

        if et < segment.start_et || et > segment.end_et {
            return Err(SpkError::TimeOutOfRange { target, et });
        }
        if segment.data_type != 2 {
            return Err(SpkError::UnsupportedType {
                data_type: segment.data_type,
            });
        }

        let pos = self.evaluate_type2(&segment, et)?;
        Ok((pos, segment.center))
    }

    fn evaluate_type2(&self, segment: &SegmentSummary, et: f64) -> SpkResult<[f64; 3]> {
        if segment.end_word < segment.start_word + DIRECTORY_WORDS {
            return Err(SpkError::InvalidData("segment too short for directory".into()));
        }

        let directory = self
            .daf
            .read_words(segment.end_word - DIRECTORY_WORDS + 1, DIRECTORY_WORDS)?;
        let init = directory[0];
        let interval_len = directory[1];
        let record_size = directory[2] as usize;
        let record_count = directory[3] as usize;

        if interval_len <= 0.0 || record_size < 5 || record_count == 0 {
            return Err(SpkError::InvalidData(format!(
                "bad type 2 directory: intlen={interval_len} rsize={record_size} n={record_count}"
            )));
        }

        let index = (((et - init) / interval_len).floor() as i64)
            .clamp(0, record_count as i64 - 1) as usize;
        let record_word = segment.start_word + index * record_size;
        let record = self.daf.read_words(record_word, record_size)?;
        chebyshev::evaluate_record(&record, et)
    }

    /// Position of a body relative to the solar-system barycenter, in km.
    pub fn ssb_position(&self, body: i32, et: f64) -> SpkResult<[f64; 3]> {
        let mut total = [0.0; 3];
        let mut current = body;
        let mut hops = 0;

        while current != SSB {
            hops += 1;
            if hops > 8 {
                return Err(SpkError::InvalidData(format!(
                    "center chain from body {body} does not reach the barycenter"
                )));
            }
            let (pos, center) = self.segment_position(current, et)?;
            total[0] += pos[0];
            total[1] += pos[1];
            total[2] += pos[2];
            current = center;
        }

        Ok(total)
    }

    /// Geocentric position of a body in km, ICRF axes.
    pub fn geocentric_position(&self, body: i32, et: f64) -> SpkResult<[f64; 3]> {
        let body_ssb = self.ssb_position(body, et)?;
        let earth_ssb = self.ssb_position(EARTH, et)?;
        Ok([
            body_ssb[0] - earth_ssb[0],
            body_ssb[1] - earth_ssb[1],
            body_ssb[2] - earth_ssb[2],
        ])
    }
}
