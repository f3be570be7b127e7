//! Bracket-and-bisect refinement of a crossing instant.
//!
//! Rise/set detection and solar-term location are the same abstract
//! operation: a residual function of time passes through zero somewhere
//! inside a bracketing interval, and the zero must be pinned down to
//! sub-second precision. This module implements that refinement once.
//!
//! The residual is required to be increasing through zero across the
//! bracket (negative at the low end, positive at the high end). Callers
//! orient it: a setting body negates its altitude, a longitude search
//! feeds the wrap-aware signed separation from the target.

use crate::errors::AlmanacResult;
use chrono::{DateTime, Utc};

/// Residual magnitude, in the caller's units (degrees here), below which
/// the crossing counts as found.
pub const DEFAULT_TOLERANCE: f64 = 1.0e-4;

/// Halving cap. From a ten-minute bracket this is far past f64 time
/// resolution, so the cap only matters for degenerate residuals.
pub const MAX_ITERATIONS: usize = 50;

/// Refines a crossing instant inside `[lo, hi]` by bisection.
///
/// Returns the midpoint at which `|residual|` first drops below
/// `tolerance`, or the final midpoint once the iteration cap is reached.
/// The cap is treated as "close enough" rather than a failure, matching
/// the coarse searches that feed this function.
pub fn bisect_crossing<F>(
    mut lo: DateTime<Utc>,
    mut hi: DateTime<Utc>,
    residual: F,
    tolerance: f64,
) -> AlmanacResult<DateTime<Utc>>
where
    F: Fn(DateTime<Utc>) -> AlmanacResult<f64>,
{
    for _ in 0..MAX_ITERATIONS {
        let mid = midpoint(lo, hi);
        let value = residual(mid)?;
        if value.abs() < tolerance {
            return Ok(mid);
        }
        if value < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(midpoint(lo, hi))
}

fn midpoint(lo: DateTime<Utc>, hi: DateTime<Utc>) -> DateTime<Utc> {
    lo + (hi - lo) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AlmanacError;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap()
    }

    #[test]
    fn finds_linear_zero() {
        // Residual crosses zero exactly 2500 s after t0.
        let zero = t0() + Duration::seconds(2500);
        let residual = |t: DateTime<Utc>| Ok((t - zero).num_milliseconds() as f64 / 1000.0 * 0.01);

        let found = bisect_crossing(t0(), t0() + Duration::seconds(3600), residual, 1e-4).unwrap();
        assert!((found - zero).num_milliseconds().abs() < 1000);
    }

    #[test]
    fn converges_to_tolerance() {
        let zero = t0() + Duration::seconds(1234);
        // Steep residual: 1°/s, so the 1e-4° tolerance demands 0.1 ms.
        let residual = |t: DateTime<Utc>| Ok((t - zero).num_milliseconds() as f64 / 1000.0);

        let found = bisect_crossing(t0(), t0() + Duration::seconds(3600), residual, 1e-4).unwrap();
        let err = residual(found).unwrap().abs();
        assert!(err < 1e-4, "residual after refinement: {err}");
    }

    #[test]
    fn iteration_cap_returns_midpoint() {
        // A residual that never satisfies the tolerance: constant sign
        // magnitude 1 on each side.
        let zero = t0() + Duration::seconds(1800);
        let residual =
            |t: DateTime<Utc>| Ok(if t < zero { -1.0 } else { 1.0 });

        let found = bisect_crossing(t0(), t0() + Duration::seconds(3600), residual, 1e-4).unwrap();
        // Still brackets the discontinuity tightly.
        assert!((found - zero).num_seconds().abs() <= 1);
    }

    #[test]
    fn propagates_residual_errors() {
        let residual =
            |_t: DateTime<Utc>| -> AlmanacResult<f64> { Err(AlmanacError::Computation("boom".into())) };
        let result = bisect_crossing(t0(), t0() + Duration::seconds(60), residual, 1e-4);
        assert!(matches!(result, Err(AlmanacError::Computation(_))));
    }
}
