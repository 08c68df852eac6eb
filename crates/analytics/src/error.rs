use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Cannot compute returns from an empty price series: {0}")]
    EmptyInput(String),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}

impl From<CoreError> for AnalyticsError {
    fn from(error: CoreError) -> Self {
        AnalyticsError::Calculation(error.to_string())
    }
}
