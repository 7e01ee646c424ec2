use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network errors from reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// External service answered with an unexpected status or payload
    #[error("External service error: {0}")]
    ExternalService(String),

    /// A required entry is absent from the rate table
    #[error("Missing rate: {0}")]
    MissingRate(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Message(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Check if error is a missing file (expected on first history load)
    pub fn is_missing_file(&self) -> bool {
        matches!(self, AppError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Check if error aborts a whole polling cycle rather than a single coin
    pub fn is_cycle_fatal(&self) -> bool {
        matches!(
            self,
            AppError::MissingRate(_) | AppError::Http(_) | AppError::ExternalService(_)
        )
    }
}
