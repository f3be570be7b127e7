use thiserror::Error;

/// Errors raised while opening or reading an SPK kernel file.
#[derive(Debug, Error)]
pub enum SpkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("kernel format error: {0}")]
    Format(String),

    #[error("no segment for body {target}")]
    MissingSegment { target: i32 },

    #[error("body {target} has no coverage at ET {et:.3}")]
    TimeOutOfRange { target: i32, et: f64 },

    #[error("unsupported SPK data type {data_type} (only type 2 is read)")]
    UnsupportedType { data_type: i32 },

    #[error("invalid kernel data: {0}")]
    InvalidData(String),
}

pub type SpkResult<T> = Result<T, SpkError>;

/// Errors surfaced by the [`Ephemeris`](crate::Ephemeris) provider.
///
/// `Unavailable` is permanent-until-restart: the model failed to load and
/// no retry will change that. Everything else is a per-query kernel fault.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("ephemeris unavailable: kernel failed to load at startup")]
    Unavailable,

    #[error(transparent)]
    Kernel(#[from] SpkError),
}

pub type EphemerisResult<T> = Result<T, EphemerisError>;
