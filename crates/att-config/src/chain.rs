//! Blockchain network and contract configuration.

use serde::{Deserialize, Serialize};

/// Default receipt polling interval in seconds.
const fn default_poll_interval_secs() -> u64 {
    5
}

fn default_network() -> String {
    "sepolia".into()
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".into()
}

fn default_explorer_url() -> String {
    "https://sepolia.etherscan.io".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    /// Address of the deployed compliance contract (`0x` + 40 hex digits).
    /// Empty means not configured.
    #[serde(default)]
    pub contract_address: String,

    /// Network name, informational (e.g., `sepolia`).
    #[serde(default = "default_network")]
    pub network: String,

    /// JSON-RPC endpoint of the wallet or node that signs submissions.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Seconds between receipt polls while a transaction is pending.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Block explorer base URL used to build transaction links.
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            contract_address: String::new(),
            network: default_network(),
            rpc_url: default_rpc_url(),
            poll_interval_secs: default_poll_interval_secs(),
            explorer_url: default_explorer_url(),
        }
    }
}

impl ChainConfig {
    /// Check if a real contract address has been provided.
    pub fn is_configured(&self) -> bool {
        self.contract_address().is_some()
    }

    /// The contract address, or `None` when unset or still the all-zero
    /// placeholder.
    pub fn contract_address(&self) -> Option<&str> {
        let address = self.contract_address.trim();
        let placeholder = address
            .strip_prefix("0x")
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b == b'0'));
        (!address.is_empty() && !placeholder).then_some(address)
    }

    /// Explorer link for a transaction hash.
    pub fn explorer_tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{hash}", self.explorer_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = ChainConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.contract_address(), None);
        assert_eq!(config.network, "sepolia");
        assert_eq!(config.poll_interval_secs, 5);
    }

    #[test]
    fn whitespace_address_is_not_configured() {
        let config = ChainConfig {
            contract_address: "   ".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn zero_placeholder_is_not_configured() {
        let config = ChainConfig {
            contract_address: "0x0000000000000000000000000000000000000000".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
        assert_eq!(config.contract_address(), None);
    }

    #[test]
    fn explorer_link_handles_trailing_slash() {
        let config = ChainConfig {
            explorer_url: "https://sepolia.etherscan.io/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.explorer_tx_url("0xabc"),
            "https://sepolia.etherscan.io/tx/0xabc"
        );
    }
}
