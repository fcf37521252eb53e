//! Rule engine and predictor error types.

use att_core::errors::CoreError;
use thiserror::Error;

/// Errors from evaluating the compliance rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The record cannot be scored (e.g. zero sales target).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<CoreError> for RuleError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(message) => Self::Validation(message),
            other => Self::Validation(other.to_string()),
        }
    }
}

/// Errors from producing a verdict, locally or remotely.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Rules(#[from] RuleError),

    /// HTTP transport error talking to the prediction API.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Prediction API returned a non-success status code.
    #[error("prediction API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Prediction API answered with something that is not a usable verdict.
    #[error("invalid prediction response: {0}")]
    InvalidResponse(String),
}
