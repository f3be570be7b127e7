//! Ephemeris provider for the pelorus celestial watch engine.
//!
//! Reads a JPL DAF/SPK planetary kernel (DE421-class) and answers the three
//! questions the rest of the workspace asks:
//!
//! 1. Where is a body geocentrically? — [`Ephemeris::geocentric`]
//! 2. Where does an observer see it in the sky? — [`Ephemeris::apparent`]
//! 3. What is its ecliptic longitude of date? — [`Ephemeris::ecliptic_longitude`]
//!
//! The kernel file is memory-mapped and never modified; every query is a
//! pure function of (body, time). A kernel that failed to load at startup
//! is a permanent condition: the provider stays constructible via
//! [`Ephemeris::unavailable`] and every query then returns
//! [`EphemerisError::Unavailable`] until the process restarts.
//!
//! # Accuracy envelope
//!
//! Positions come straight from the kernel's Chebyshev fits. The frame
//! reduction applies IAU 1976 precession, the mean obliquity of date, and
//! the constant solar aberration term; nutation and light-time are
//! neglected. That bounds apparent directions to roughly half an
//! arcminute, comfortably inside this engine's sub-second event-timing
//! requirement and far from astrometric-grade goals.

pub mod chebyshev;
pub mod daf;
pub mod errors;
pub mod frames;
pub mod kernel;
pub mod provider;

pub use errors::{EphemerisError, EphemerisResult, SpkError, SpkResult};
pub use kernel::SpkKernel;
pub use provider::{Body, Ephemeris, Horizontal};
