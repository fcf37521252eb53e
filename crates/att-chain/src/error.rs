//! Chain error types.

use thiserror::Error;

/// Failures surfaced by [`TransactionTracker`](crate::TransactionTracker).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Contract address missing, malformed, or still the placeholder.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// The user declined the connection or the transaction.
    #[error("wallet rejected the request: {0}")]
    WalletRejected(String),

    #[error("transaction submission failed: {0}")]
    Submission(String),

    #[error("failed to poll transaction {hash}: {message}")]
    Poll { hash: String, message: String },
}

/// Errors raised by a [`WalletGateway`](crate::WalletGateway) implementation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No wallet or node is reachable.
    #[error("wallet unavailable: {0}")]
    Unavailable(String),

    /// The user (or signer) rejected the request.
    #[error("rejected: {0}")]
    Rejected(String),

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with something that does not decode.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Classify a gateway failure during submission.
    #[must_use]
    pub fn into_submission_error(self) -> ChainError {
        match self {
            Self::Unavailable(message) => ChainError::WalletUnavailable(message),
            Self::Rejected(message) => ChainError::WalletRejected(message),
            other => ChainError::Submission(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_classification() {
        assert_eq!(
            GatewayError::Unavailable("no provider".into()).into_submission_error(),
            ChainError::WalletUnavailable("no provider".into())
        );
        assert_eq!(
            GatewayError::Rejected("user denied".into()).into_submission_error(),
            ChainError::WalletRejected("user denied".into())
        );
        assert!(matches!(
            GatewayError::Rpc {
                code: -32000,
                message: "insufficient funds".into()
            }
            .into_submission_error(),
            ChainError::Submission(message) if message.contains("insufficient funds")
        ));
    }
}
