use pelorus_ephemeris::EphemerisError;
use thiserror::Error;

/// Errors from almanac searches.
///
/// `Unavailable` mirrors the ephemeris provider's permanent failed-load
/// state. `Computation` covers per-query numeric and kernel faults; those
/// self-heal by being retried at the next scheduled recomputation.
/// Circumpolar days are *not* errors; they are ordinary
/// [`HorizonCrossings`](crate::HorizonCrossings) outcomes.
#[derive(Debug, Error)]
pub enum AlmanacError {
    #[error("ephemeris unavailable")]
    Unavailable,

    #[error("computation failed: {0}")]
    Computation(String),
}

impl From<EphemerisError> for AlmanacError {
    fn from(err: EphemerisError) -> Self {
        match err {
            EphemerisError::Unavailable => Self::Unavailable,
            EphemerisError::Kernel(e) => Self::Computation(e.to_string()),
        }
    }
}

pub type AlmanacResult<T> = Result<T, AlmanacError>;
