//! Compliance prediction configuration.

use serde::{Deserialize, Serialize};

/// Simulated evaluation latency in milliseconds.
const fn default_latency_ms() -> u64 {
    1500
}

/// Working days in a canonical full month.
const fn default_full_month_days() -> u32 {
    22
}

fn default_api_base_url() -> String {
    "http://localhost:3001".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictionConfig {
    /// Base URL of the remote prediction API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Use the remote API instead of the local rule engine.
    #[serde(default)]
    pub remote: bool,

    /// Delay before the local rule engine answers.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    #[serde(default = "default_full_month_days")]
    pub full_month_days: u32,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            remote: false,
            latency_ms: default_latency_ms(),
            full_month_days: default_full_month_days(),
        }
    }
}
