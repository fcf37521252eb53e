//! # att-pipeline
//!
//! The single source of truth for one compliance run and the orchestration
//! that fills it in.
//!
//! - [`PipelineState`] holds the employee record, verdict, transaction, and
//!   loading/error flags. [`reduce`] is the only way to change it.
//! - [`Store`] shares that state behind a `tokio::sync::watch` channel so
//!   consumers can subscribe to changes.
//! - [`Pipeline`] runs prediction and submission, polls the transaction
//!   until it settles, and cancels all in-flight work on reset.

mod error;
mod pipeline;
mod state;
mod store;

pub use error::PipelineError;
pub use pipeline::{Evaluation, Pipeline};
pub use state::{Action, PipelineState, TransitionError, reduce};
pub use store::Store;
