//! [`WalletGateway`] over Ethereum JSON-RPC.
//!
//! Signing is left to the node or wallet behind the endpoint
//! (`eth_sendTransaction`), so this client never holds keys.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hex::FromHex;
use serde_json::{Value, json};

use crate::address::ContractAddress;
use crate::error::GatewayError;
use crate::gateway::{Receipt, SignerHandle, SubmittedTransaction, WalletGateway};
use crate::payload::CompliancePayload;

/// EIP-1193 "user rejected request".
const USER_REJECTED: i64 = 4001;

#[derive(Debug)]
pub struct JsonRpcGateway {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcGateway {
    /// # Errors
    ///
    /// Returns `GatewayError::Http` if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("attest/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, GatewayError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });

        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    GatewayError::Unavailable(format!("cannot reach {}: {e}", self.url))
                } else {
                    GatewayError::Http(e)
                }
            })?;
        if !resp.status().is_success() {
            return Err(GatewayError::InvalidResponse(format!(
                "{method} returned HTTP {}",
                resp.status().as_u16()
            )));
        }
        let envelope: Value = resp
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        tracing::trace!(method, id, "json-rpc response received");
        parse_rpc_response(envelope)
    }

    async fn accounts(&self, method: &str) -> Result<Vec<String>, GatewayError> {
        parse_accounts(self.call(method, json!([])).await?)
    }
}

#[async_trait]
impl WalletGateway for JsonRpcGateway {
    async fn is_wallet_available(&self) -> bool {
        self.call("web3_clientVersion", json!([])).await.is_ok()
    }

    async fn is_wallet_connected(&self) -> bool {
        self.accounts("eth_accounts")
            .await
            .is_ok_and(|accounts| !accounts.is_empty())
    }

    async fn request_connection(&self) -> Result<SignerHandle, GatewayError> {
        let accounts = self.accounts("eth_requestAccounts").await?;
        accounts
            .into_iter()
            .next()
            .map(|address| SignerHandle { address })
            .ok_or_else(|| GatewayError::Rejected("no account was authorized".into()))
    }

    async fn submit_compliance_record(
        &self,
        signer: &SignerHandle,
        contract: &ContractAddress,
        payload: &CompliancePayload,
    ) -> Result<SubmittedTransaction, GatewayError> {
        let tx = json!({
            "from": signer.address,
            "to": contract.as_str(),
            "data": payload.encode_call_hex(),
        });
        let result = self.call("eth_sendTransaction", json!([tx])).await?;
        let hash = parse_tx_hash(&result)?;
        Ok(SubmittedTransaction { hash })
    }

    async fn get_receipt(&self, hash: &str) -> Result<Option<Receipt>, GatewayError> {
        let result = self
            .call("eth_getTransactionReceipt", json!([hash]))
            .await?;
        parse_receipt(&result)
    }
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

fn parse_rpc_response(envelope: Value) -> Result<Value, GatewayError> {
    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(if code == USER_REJECTED {
            GatewayError::Rejected(message)
        } else {
            GatewayError::Rpc { code, message }
        });
    }
    match envelope {
        Value::Object(mut map) => map
            .remove("result")
            .ok_or_else(|| GatewayError::InvalidResponse("missing result".into())),
        other => Err(GatewayError::InvalidResponse(format!(
            "expected a JSON-RPC object, got {other}"
        ))),
    }
}

fn parse_accounts(result: Value) -> Result<Vec<String>, GatewayError> {
    serde_json::from_value(result).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

fn parse_tx_hash(result: &Value) -> Result<String, GatewayError> {
    let hash = result
        .as_str()
        .ok_or_else(|| GatewayError::InvalidResponse(format!("expected a hash, got {result}")))?;
    let valid = hash
        .strip_prefix("0x")
        .is_some_and(|digits| <[u8; 32]>::from_hex(digits).is_ok());
    if !valid {
        return Err(GatewayError::InvalidResponse(format!(
            "malformed transaction hash '{hash}'"
        )));
    }
    Ok(hash.to_ascii_lowercase())
}

fn parse_receipt(result: &Value) -> Result<Option<Receipt>, GatewayError> {
    if result.is_null() {
        return Ok(None);
    }
    let block_number = result
        .get("blockNumber")
        .and_then(Value::as_str)
        .map(parse_quantity)
        .transpose()?;
    let success = result
        .get("status")
        .and_then(Value::as_str)
        .map(parse_quantity)
        .transpose()?
        == Some(1);
    Ok(Some(Receipt {
        block_number,
        success,
    }))
}

/// Decode a hex `QUANTITY` such as `"0x3039"`.
fn parse_quantity(raw: &str) -> Result<u64, GatewayError> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| GatewayError::InvalidResponse(format!("quantity '{raw}' lacks 0x")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| GatewayError::InvalidResponse(format!("quantity '{raw}': {e}")))
}
