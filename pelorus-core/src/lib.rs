//! Shared foundation for the pelorus celestial watch engine.
//!
//! `pelorus-core` provides the small, dependency-light building blocks the
//! rest of the workspace leans on: degree-based angle normalization, a
//! split Julian Date, the validated observer coordinate pair, and the
//! centralized local⇄UTC clock used at every presentation boundary.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`angle`] | Degree wrapping and shortest signed separation over a circular domain |
//! | [`julian`] | Split Julian Date, calendar conversion, `chrono` interop |
//! | [`observer`] | Validated geographic observer position |
//! | [`clock`] | Local⇄UTC conversion against one captured offset |
//! | [`constants`] | Epochs and unit conversions shared across the workspace |
//! | [`errors`] | [`CoreError`] and [`CoreResult`] |
//!
//! # Design Notes
//!
//! - **Degrees at the API surface**: unlike observatory-grade pipelines this
//!   engine speaks degrees everywhere; radians appear only inside
//!   trigonometric call sites.
//! - **Two-part Julian Dates**: `jd1` holds the date at midnight, `jd2` the
//!   day fraction, preserving sub-second precision across a full year of
//!   arithmetic.
//! - **One clock**: every local-time conversion flows through
//!   [`clock::LocalClock`] so the whole engine agrees on a single UTC
//!   offset snapshot.

pub mod angle;
pub mod clock;
pub mod constants;
pub mod errors;
pub mod julian;
pub mod observer;

pub use clock::LocalClock;
pub use errors::{CoreError, CoreResult};
pub use julian::JulianDate;
pub use observer::Observer;
