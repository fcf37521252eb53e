//! The async seam between the pipeline and whatever produces verdicts.

use std::time::Duration;

use async_trait::async_trait;
use att_core::entities::{ComplianceVerdict, EmployeeRecord};

use crate::engine::RuleEngine;
use crate::error::{PredictionError, RuleError};

#[async_trait]
pub trait Predictor: Send + Sync {
    /// Produce a verdict for a validated record.
    ///
    /// # Errors
    ///
    /// Implementations return `PredictionError::Rules` for records that
    /// cannot be scored and transport variants for remote failures.
    async fn predict(&self, record: &EmployeeRecord) -> Result<ComplianceVerdict, PredictionError>;
}

/// Runs the [`RuleEngine`] in-process after a simulated evaluation delay.
#[derive(Debug, Clone)]
pub struct LocalPredictor {
    engine: RuleEngine,
    latency: Duration,
}

impl Default for LocalPredictor {
    fn default() -> Self {
        Self::new(RuleEngine::default(), Duration::from_millis(1_500))
    }
}

impl LocalPredictor {
    pub const fn new(engine: RuleEngine, latency: Duration) -> Self {
        Self { engine, latency }
    }

    #[must_use]
    pub const fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl Predictor for LocalPredictor {
    async fn predict(&self, record: &EmployeeRecord) -> Result<ComplianceVerdict, PredictionError> {
        record.validate().map_err(RuleError::from)?;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.engine.evaluate(record)?)
    }
}
