// errors.rs
use crate::analysis::AnalysisError;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, missing resources, bad form input) or downstream layers (DB).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Internal Server Error")]
    InternalError,
}

impl From<AnalysisError> for ServerError {
    fn from(err: AnalysisError) -> Self {
        ServerError::BadRequest(err.to_string())
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(err: rusqlite::Error) -> Self {
        ServerError::DbError(err.to_string())
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::DbError(format!("stored record is not valid JSON: {err}"))
    }
}
