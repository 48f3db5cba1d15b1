//! Error types for the forecast_stack crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the forecast_stack crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Time index is missing, irregular, or has no inferable frequency
    #[error("Frequency error: {0}")]
    FrequencyError(String),

    /// Predict was called on a model that has not been fitted
    #[error("Model '{0}' has not been fitted")]
    NotFittedError(String),

    /// Exogenous columns drifted between fit and predict
    #[error("Column mismatch: {0}")]
    ColumnMismatchError(String),

    /// Ensemble has no base learners
    #[error("Ensemble has no base learners")]
    EmptyEnsembleError,

    /// Not enough observations for the requested operation
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientDataError { required: usize, actual: usize },

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A base learner failed inside an ensemble
    #[error("Base learner '{name}' failed during {stage}: {source}")]
    BaseLearnerError {
        name: String,
        stage: String,
        #[source]
        source: Box<ForecastError>,
    },

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl ForecastError {
    /// Attach base-learner context to an error surfaced inside an ensemble
    pub(crate) fn in_base_learner(self, name: &str, stage: &str) -> Self {
        ForecastError::BaseLearnerError {
            name: name.to_string(),
            stage: stage.to_string(),
            source: Box::new(self),
        }
    }
}
