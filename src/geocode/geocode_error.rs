use thiserror::Error;

/// Why a lookup produced nothing. Logged, never shown to users.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Geocoder HTTP {0}")]
    Status(u16),

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Unexpected data shape: {0}")]
    UnexpectedShape(String),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GeocodeError::JsonParse(e.to_string())
        } else {
            GeocodeError::Network(e.to_string())
        }
    }
}
