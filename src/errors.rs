// errors.rs
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, missing resources, validation) or downstream layers (DB, xlsx).
///
/// Geocoding and parcel lookups have their own error types and never
/// surface through here.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::DbError(_)
            | ServerError::XlsxError(_)
            | ServerError::Config(_)
            | ServerError::InternalError => 500,
        }
    }

    /// Message safe to show a user. Storage and spreadsheet detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::NotFound => "Not found".to_string(),
            ServerError::BadRequest(msg) => msg.clone(),
            ServerError::Unauthorized(msg) => msg.clone(),
            ServerError::DbError(_) => "Could not save".to_string(),
            ServerError::XlsxError(_) => "Could not build the export".to_string(),
            ServerError::Config(_) | ServerError::InternalError => {
                "Internal Server Error".to_string()
            }
        }
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::DbError(e.to_string())
    }
}
