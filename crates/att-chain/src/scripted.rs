//! An in-process wallet for dry runs and tests.
//!
//! Every submission gets a fresh deterministic hash. Unless a script says
//! otherwise, its receipt is absent for `pending_polls` queries and then
//! reports success in a block numbered from `first_block`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::address::ContractAddress;
use crate::error::GatewayError;
use crate::gateway::{Receipt, SignerHandle, SubmittedTransaction, WalletGateway};
use crate::payload::CompliancePayload;

/// What a scripted hash reports, one step per `get_receipt` call. The last
/// step repeats once the script runs out.
#[derive(Debug, Clone)]
pub enum ReceiptStep {
    NotMined,
    Mined(Receipt),
    Error(String),
}

#[derive(Debug, Default)]
struct Inner {
    submitted: Vec<(String, CompliancePayload)>,
    scripts: HashMap<String, Vec<ReceiptStep>>,
    polls: HashMap<String, usize>,
    counter: u64,
}

#[derive(Debug)]
pub struct ScriptedGateway {
    available: bool,
    reject: bool,
    account: String,
    pending_polls: usize,
    first_block: u64,
    inner: Mutex<Inner>,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self {
            available: true,
            reject: false,
            account: "0x00000000000000000000000000000000000a77e5".into(),
            pending_polls: 1,
            first_block: 12_345,
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl ScriptedGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway with no wallet behind it.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    /// Reject every connection request and submission.
    #[must_use]
    pub const fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    /// Number of `get_receipt` calls that see no receipt before success.
    #[must_use]
    pub const fn with_pending_polls(mut self, polls: usize) -> Self {
        self.pending_polls = polls;
        self
    }

    #[must_use]
    pub const fn with_first_block(mut self, block: u64) -> Self {
        self.first_block = block;
        self
    }

    /// Override what `hash` reports.
    pub fn script(&self, hash: impl Into<String>, steps: Vec<ReceiptStep>) {
        self.lock().scripts.insert(hash.into(), steps);
    }

    /// The hash the next submission will receive.
    #[must_use]
    pub fn next_hash(&self) -> String {
        hash_for(self.lock().counter + 1)
    }

    /// Payloads submitted so far, with the hash each was given.
    #[must_use]
    pub fn submitted(&self) -> Vec<(String, CompliancePayload)> {
        self.lock().submitted.clone()
    }

    /// How many times `get_receipt` was called for `hash`.
    #[must_use]
    pub fn poll_count(&self, hash: &str) -> usize {
        self.lock().polls.get(hash).copied().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // The guarded data stays consistent even if a holder panicked.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn hash_for(counter: u64) -> String {
    format!("0x{counter:064x}")
}

#[async_trait]
impl WalletGateway for ScriptedGateway {
    async fn is_wallet_available(&self) -> bool {
        self.available
    }

    async fn is_wallet_connected(&self) -> bool {
        self.available && !self.reject
    }

    async fn request_connection(&self) -> Result<SignerHandle, GatewayError> {
        if !self.available {
            return Err(GatewayError::Unavailable("no wallet provider installed".into()));
        }
        if self.reject {
            return Err(GatewayError::Rejected("user rejected the request".into()));
        }
        Ok(SignerHandle {
            address: self.account.clone(),
        })
    }

    async fn submit_compliance_record(
        &self,
        _signer: &SignerHandle,
        _contract: &ContractAddress,
        payload: &CompliancePayload,
    ) -> Result<SubmittedTransaction, GatewayError> {
        if !self.available {
            return Err(GatewayError::Unavailable("no wallet provider installed".into()));
        }
        if self.reject {
            return Err(GatewayError::Rejected("user denied transaction signature".into()));
        }
        let mut inner = self.lock();
        inner.counter += 1;
        let hash = hash_for(inner.counter);
        inner.submitted.push((hash.clone(), payload.clone()));
        Ok(SubmittedTransaction { hash })
    }

    async fn get_receipt(&self, hash: &str) -> Result<Option<Receipt>, GatewayError> {
        let mut inner = self.lock();
        let seen = {
            let count = inner.polls.entry(hash.to_string()).or_default();
            *count += 1;
            *count
        };

        if let Some(steps) = inner.scripts.get(hash) {
            return match steps.get(seen - 1).or_else(|| steps.last()) {
                None | Some(ReceiptStep::NotMined) => Ok(None),
                Some(ReceiptStep::Mined(receipt)) => Ok(Some(*receipt)),
                Some(ReceiptStep::Error(message)) => {
                    Err(GatewayError::Unavailable(message.clone()))
                }
            };
        }

        let Some(index) = inner.submitted.iter().position(|(h, _)| h == hash) else {
            return Ok(None);
        };
        if seen <= self.pending_polls {
            return Ok(None);
        }
        Ok(Some(Receipt {
            block_number: Some(self.first_block + index as u64),
            success: true,
        }))
    }
}
