//! Submission and status queries for compliance transactions.

use std::sync::Arc;

use att_core::entities::{ComplianceVerdict, EmployeeRecord, TransactionRecord};
use att_core::enums::TransactionStatus;

use crate::address::ContractAddress;
use crate::error::ChainError;
use crate::gateway::{Receipt, WalletGateway};
use crate::payload::CompliancePayload;

/// Drives a [`WalletGateway`] through the `Idle → Pending → {Confirmed, Failed}`
/// lifecycle of one compliance transaction at a time.
#[derive(Clone)]
pub struct TransactionTracker {
    gateway: Arc<dyn WalletGateway>,
    contract: Result<ContractAddress, ChainError>,
}

impl std::fmt::Debug for TransactionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionTracker")
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

impl TransactionTracker {
    /// Build a tracker. An unusable `contract_address` is not an error here;
    /// it surfaces as `ChainError::Configuration` on [`Self::submit`].
    pub fn new(gateway: Arc<dyn WalletGateway>, contract_address: Option<&str>) -> Self {
        let contract = ContractAddress::parse(contract_address.unwrap_or_default());
        Self { gateway, contract }
    }

    #[must_use]
    pub fn contract(&self) -> Option<&ContractAddress> {
        self.contract.as_ref().ok()
    }

    #[must_use]
    pub fn gateway(&self) -> &Arc<dyn WalletGateway> {
        &self.gateway
    }

    /// Send the compliance record and return as soon as the wallet hands back
    /// a hash. Confirmation is observed separately through polling.
    ///
    /// # Errors
    ///
    /// - `ChainError::Configuration` if the contract address is missing,
    ///   malformed, or the zero placeholder.
    /// - `ChainError::WalletUnavailable` if there is no wallet.
    /// - `ChainError::WalletRejected` if the user declines.
    /// - `ChainError::Submission` for any other failure.
    pub async fn submit(
        &self,
        record: &EmployeeRecord,
        verdict: &ComplianceVerdict,
    ) -> Result<TransactionRecord, ChainError> {
        let contract = self.contract.clone()?;

        if !self.gateway.is_wallet_available().await {
            return Err(ChainError::WalletUnavailable(
                "no wallet provider found; install or start a wallet to continue".into(),
            ));
        }
        let signer = self
            .gateway
            .request_connection()
            .await
            .map_err(crate::error::GatewayError::into_submission_error)?;

        let payload = CompliancePayload::new(record, verdict);
        tracing::debug!(
            contract = %contract,
            employee_id = %payload.employee_id,
            confidence_bps = payload.confidence_bps,
            "submitting compliance record"
        );

        let submitted = self
            .gateway
            .submit_compliance_record(&signer, &contract, &payload)
            .await
            .map_err(crate::error::GatewayError::into_submission_error)?;

        tracing::info!(
            hash = %submitted.hash,
            employee_id = %payload.employee_id,
            "compliance transaction submitted"
        );
        Ok(TransactionRecord::pending(submitted.hash))
    }

    /// Query the receipt once, keeping gateway failures distinguishable.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Poll` if the gateway query fails.
    pub async fn try_poll_status(&self, hash: &str) -> Result<TransactionRecord, ChainError> {
        let receipt = self
            .gateway
            .get_receipt(hash)
            .await
            .map_err(|e| ChainError::Poll {
                hash: hash.to_string(),
                message: e.to_string(),
            })?;
        let record = record_from_receipt(hash, receipt);
        tracing::debug!(
            hash,
            status = %record.status,
            block = ?record.block_number,
            "transaction polled"
        );
        Ok(record)
    }

    /// Query the receipt once. A failed query reads as a failed transaction.
    pub async fn poll_status(&self, hash: &str) -> TransactionRecord {
        match self.try_poll_status(hash).await {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(%error, hash, "poll failed; reporting transaction as failed");
                TransactionRecord {
                    hash: hash.to_string(),
                    status: TransactionStatus::Failed,
                    block_number: None,
                }
            }
        }
    }
}

fn record_from_receipt(hash: &str, receipt: Option<Receipt>) -> TransactionRecord {
    match receipt {
        None => TransactionRecord::pending(hash),
        Some(receipt) => TransactionRecord {
            hash: hash.to_string(),
            status: if receipt.success {
                TransactionStatus::Confirmed
            } else {
                TransactionStatus::Failed
            },
            block_number: receipt.block_number,
        },
    }
}
