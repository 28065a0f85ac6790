use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterchangeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input parsed but does not have the shape of a model document.
    #[error("Invalid file format: {0}")]
    Format(String),
}

impl From<core_types::CoreError> for InterchangeError {
    fn from(err: core_types::CoreError) -> Self {
        InterchangeError::Format(err.to_string())
    }
}
