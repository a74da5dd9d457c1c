//! Error types for MotorTest

use thiserror::Error;

/// Result type alias using MotorTest Error
pub type Result<T> = std::result::Result<T, Error>;

/// MotorTest error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Non-success HTTP status from the backend
    #[error("API call failed: {status_text}")]
    Http { status: u16, status_text: String },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("A motor must be selected before submitting a report")]
    MissingMotor,

    #[error("Resource not found: {kind} with id {id}")]
    NotFound { kind: String, id: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn not_found(kind: impl Into<String>, id: impl ToString) -> Self {
        Error::NotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }

    /// True for failures detected locally before anything was sent.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::MissingMotor)
    }
}
