use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Period index {index} is out of range for a dataset with {periods} periods")]
    PeriodOutOfRange { index: usize, periods: usize },

    #[error("Year {0} is not part of the dataset")]
    UnknownYear(i32),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Dataset invariant violated: {0}")]
    InvalidDataset(String),
}
