//! # att-rules
//!
//! Turns an [`EmployeeRecord`](att_core::entities::EmployeeRecord) into a
//! [`ComplianceVerdict`](att_core::entities::ComplianceVerdict).
//!
//! - [`RuleEngine`] applies the threshold rules. It is pure apart from the
//!   confidence noise, which comes from an injected [`NoiseSource`].
//! - [`Predictor`] is the async seam the pipeline calls. [`LocalPredictor`]
//!   wraps the rule engine behind a simulated evaluation delay;
//!   [`HttpPredictor`] asks a remote prediction API instead.

mod engine;
mod error;
mod noise;
mod predictor;
mod remote;

pub use engine::{Assessment, RuleEngine, RuleThresholds};
pub use error::{PredictionError, RuleError};
pub use noise::{FixedNoise, NoiseSource, SystemNoise};
pub use predictor::{LocalPredictor, Predictor};
pub use remote::HttpPredictor;
