//! The narrow interface to a wallet and the contract behind it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::address::ContractAddress;
use crate::error::GatewayError;
use crate::payload::CompliancePayload;

/// The account that will sign submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerHandle {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedTransaction {
    pub hash: String,
}

/// The part of a mined transaction's receipt the tracker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub block_number: Option<u64>,
    pub success: bool,
}

#[async_trait]
pub trait WalletGateway: Send + Sync {
    /// Whether a wallet provider is present at all.
    async fn is_wallet_available(&self) -> bool;

    /// Whether at least one account is already authorized.
    async fn is_wallet_connected(&self) -> bool;

    /// Ask the wallet to authorize an account.
    async fn request_connection(&self) -> Result<SignerHandle, GatewayError>;

    /// Send a `recordCompliance` call signed by `signer`.
    async fn submit_compliance_record(
        &self,
        signer: &SignerHandle,
        contract: &ContractAddress,
        payload: &CompliancePayload,
    ) -> Result<SubmittedTransaction, GatewayError>;

    /// `None` until the transaction is mined.
    async fn get_receipt(&self, hash: &str) -> Result<Option<Receipt>, GatewayError>;
}
