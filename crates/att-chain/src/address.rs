use std::fmt;
use std::str::FromStr;

use hex::FromHex;
use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// A validated, lowercase `0x`-prefixed 20-byte contract address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractAddress {
    text: String,
    bytes: [u8; 20],
}

impl ContractAddress {
    pub const PLACEHOLDER: &'static str = "0x0000000000000000000000000000000000000000";

    /// # Errors
    ///
    /// Returns `ChainError::Configuration` for empty input, the all-zero
    /// placeholder, or anything other than `0x` followed by 40 hex digits.
    pub fn parse(raw: &str) -> Result<Self, ChainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ChainError::Configuration(
                "contract address is not configured".into(),
            ));
        }
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| {
                ChainError::Configuration(format!(
                    "contract address '{trimmed}' must start with 0x"
                ))
            })?;
        let bytes = <[u8; 20]>::from_hex(digits).map_err(|error| {
            ChainError::Configuration(format!(
                "contract address '{trimmed}' must be 0x followed by 40 hex digits ({error})"
            ))
        })?;
        if bytes == [0_u8; 20] {
            return Err(ChainError::Configuration(
                "contract address is still the zero placeholder".into(),
            ));
        }
        Ok(Self {
            text: format!("0x{}", hex::encode(bytes)),
            bytes,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The 20 address bytes.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 20] {
        self.bytes
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for ContractAddress {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContractAddress {
    type Error = ChainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContractAddress> for String {
    fn from(address: ContractAddress) -> Self {
        address.text
    }
}
