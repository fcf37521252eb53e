//! Pipeline error types.

use att_chain::ChainError;
use att_core::errors::CoreError;
use att_rules::PredictionError;
use thiserror::Error;

use crate::state::TransitionError;

/// Errors from driving the employee → verdict → transaction pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The employee record failed input validation.
    #[error("Validation error: {0}")]
    Validation(#[from] CoreError),

    /// The operation is out of order for the current state.
    #[error(transparent)]
    Transition(TransitionError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Another operation is in flight, or a transaction is pending or
    /// already confirmed.
    #[error("submission conflict: {0}")]
    Conflict(String),

    /// The pipeline was reset while the operation was running.
    #[error("pipeline was reset before the operation completed")]
    Cancelled,
}

impl From<TransitionError> for PipelineError {
    fn from(error: TransitionError) -> Self {
        match error {
            TransitionError::Conflict { .. } | TransitionError::Busy => {
                Self::Conflict(error.to_string())
            }
            other => Self::Transition(other),
        }
    }
}
