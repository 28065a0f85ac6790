use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Projection parameters from configuration are invalid: {0}")]
    InvalidParameters(String),
}
