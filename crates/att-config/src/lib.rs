//! # att-config
//!
//! Layered configuration loading for attest using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ATTEST_*` prefix, `__` as separator)
//! 2. Project-level `.attest/config.toml`
//! 3. User-level `~/.config/attest/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ATTEST_CHAIN__CONTRACT_ADDRESS` -> `chain.contract_address`,
//! `ATTEST_PREDICTION__LATENCY_MS` -> `prediction.latency_ms`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use att_config::AttestConfig;
//!
//! let config = AttestConfig::load_with_dotenv().expect("config");
//!
//! if let Some(address) = config.chain.contract_address() {
//!     println!("Contract: {address} on {}", config.chain.network);
//! }
//! ```

mod chain;
mod error;
mod prediction;

pub use chain::ChainConfig;
pub use error::ConfigError;
pub use prediction::PredictionConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AttestConfig {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
}

impl AttestConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed, or
    /// `ConfigError::InvalidValue` if the merged values fail [`Self::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let files = [
            Self::global_config_path(),
            Some(PathBuf::from(".attest/config.toml")),
        ];

        files
            .into_iter()
            .flatten()
            .filter(|path| path.exists())
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, path| figment.merge(Toml::file(path)),
            )
            .merge(Env::prefixed("ATTEST_").split("__"))
    }

    /// Reject values that would stall or break the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero poll interval or a zero
    /// month length.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain.poll_interval_secs".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        if self.prediction.full_month_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "prediction.full_month_days".into(),
                reason: "must be at least 1 day".into(),
            });
        }
        Ok(())
    }

    /// The chain section, if a contract address is set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when no contract address is set.
    pub fn require_chain(&self) -> Result<&ChainConfig, ConfigError> {
        if self.chain.is_configured() {
            Ok(&self.chain)
        } else {
            Err(ConfigError::NotConfigured {
                section: "chain".into(),
            })
        }
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.chain.poll_interval_secs)
    }

    pub const fn prediction_latency(&self) -> Duration {
        Duration::from_millis(self.prediction.latency_ms)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("attest").join("config.toml"))
    }

    /// Load the nearest `.env`, searching from `CARGO_MANIFEST_DIR` up to the
    /// workspace root, then the current directory. A missing file is not an
    /// error.
    fn load_dotenv_from_workspace() {
        let from_manifest = std::env::var_os("CARGO_MANIFEST_DIR").and_then(|dir| {
            PathBuf::from(dir)
                .ancestors()
                .take(3)
                .map(|ancestor| ancestor.join(".env"))
                .find(|candidate| candidate.is_file())
        });

        match from_manifest {
            Some(path) => {
                let _ = dotenvy::from_path(path);
            }
            None => {
                let _ = dotenvy::dotenv();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = AttestConfig::default();
        assert!(!config.chain.is_configured());
        assert!(!config.prediction.remote);
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.prediction_latency(), Duration::from_millis(1500));
    }

    #[test]
    fn require_chain_reports_missing_section() {
        let config = AttestConfig::default();
        let err = config.require_chain().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { section } if section == "chain"));
    }

    #[test]
    fn zero_poll_interval_is_invalid() {
        let mut config = AttestConfig::default();
        config.chain.poll_interval_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field, .. } if field == "chain.poll_interval_secs"
        ));
    }

    #[test]
    fn zero_month_length_is_invalid() {
        let mut config = AttestConfig::default();
        config.prediction.full_month_days = 0;
        assert!(config.validate().is_err());
    }
}
