//! Day- and year-scoped celestial event searches.
//!
//! Everything here is a pure search over the [`SkyModel`] trait: no
//! caches except the explicit per-year solar-term calendar, no clocks
//! except the ones passed in. The same bracket-and-bisect primitive in
//! [`search`] refines both horizon crossings and solar-longitude
//! crossings; the two problems differ only in their residual function.

pub mod errors;
pub mod model;
pub mod moonphase;
pub mod riseset;
pub mod search;
pub mod terms;

pub use errors::{AlmanacError, AlmanacResult};
pub use model::SkyModel;
pub use moonphase::{MoonPhase, PhaseBucket, Trend};
pub use riseset::{DayReport, EventInstant, HorizonCrossings, TransitInstant};
pub use terms::{SolarTerm, SolarTermCalendar};
