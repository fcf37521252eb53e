use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TransactionStatus;
use crate::errors::CoreError;

/// One blockchain submission and what is known about it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub hash: String,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl TransactionRecord {
    /// A freshly accepted submission.
    #[must_use]
    pub fn pending(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            status: TransactionStatus::Pending,
            block_number: None,
        }
    }

    /// Move this record to `status`, recording the block it landed in.
    ///
    /// Resolving to the current status is a no-op so repeated observations of
    /// the same receipt are harmless.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the status machine forbids
    /// the move (e.g. leaving a terminal state).
    pub fn resolve(
        &self,
        status: TransactionStatus,
        block_number: Option<u64>,
    ) -> Result<Self, CoreError> {
        if status == self.status {
            return Ok(self.clone());
        }
        if !self.status.can_transition_to(status) {
            return Err(CoreError::InvalidTransition {
                entity: "transaction".into(),
                id: self.hash.clone(),
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        Ok(Self {
            hash: self.hash.clone(),
            status,
            block_number: block_number.or(self.block_number),
        })
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
