//! Cross-cutting error types for attest.
//!
//! Domain-specific errors (`RuleError`, `ChainError`, `PipelineError`) live in
//! their respective crates. The CLI converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any attest crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Data failed validation (range, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity} {id} from {from} to {to}")]
    InvalidTransition {
        entity: String,
        id: String,
        from: String,
        to: String,
    },
}
