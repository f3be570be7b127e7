use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({field}): {message}")]
    InvalidCoordinate { field: &'static str, message: String },

    #[error("invalid date {year}-{month:02}-{day:02}: {message}")]
    InvalidDate {
        year: i32,
        month: u32,
        day: u32,
        message: String,
    },
}

impl CoreError {
    pub fn invalid_coordinate(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidCoordinate {
            field,
            message: message.into(),
        }
    }

    pub fn invalid_date(year: i32, month: u32, day: u32, message: impl Into<String>) -> Self {
        Self::InvalidDate {
            year,
            month,
            day,
            message: message.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
