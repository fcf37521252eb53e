use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file or environment variable could not be parsed.
    #[error("failed to read attest configuration: {0}")]
    Figment(#[from] figment::Error),

    #[error("'{section}' is not configured; set it in .attest/config.toml or ATTEST_* variables")]
    NotConfigured { section: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
