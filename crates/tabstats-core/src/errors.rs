use thiserror::Error;

/// Errors that can occur when handing data to the analysis engine
///
/// Missing selections, unparseable rows and zero-variance inputs are not
/// errors: engine functions report those as absent results.
#[derive(Error, Debug)]
pub enum StatsError {
    // Input validation errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    // Internal errors
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => StatsError::SerializationError(err.to_string()),
            _ => StatsError::InvalidInput(err.to_string()),
        }
    }
}

/// Result type for engine operations that can fail on caller error
pub type StatsResult<T> = Result<T, StatsError>;
