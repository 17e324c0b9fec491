use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParcelError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Parcel service HTTP {0}")]
    Status(u16),

    #[error("Parcel service error {code}: {message}")]
    Service { code: i64, message: String },

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Unexpected data shape: {0}")]
    UnexpectedShape(String),
}
