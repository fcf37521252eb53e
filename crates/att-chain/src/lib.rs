//! # att-chain
//!
//! Records compliance verdicts on-chain and tracks the resulting
//! transaction until it is confirmed or fails.
//!
//! - [`TransactionTracker`] submits a [`CompliancePayload`] through a
//!   [`WalletGateway`] and answers one-shot status queries.
//! - [`spawn_poller`] repeats those queries on a tokio task until the
//!   transaction settles; its [`PollHandle`] cancels on drop.
//! - [`JsonRpcGateway`] talks to an Ethereum node; [`ScriptedGateway`] is an
//!   in-process stand-in for dry runs and tests.

mod address;
mod error;
mod gateway;
mod payload;
mod poller;
mod rpc;
mod scripted;
mod tracker;

pub use address::ContractAddress;
pub use error::{ChainError, GatewayError};
pub use gateway::{Receipt, SignerHandle, SubmittedTransaction, WalletGateway};
pub use payload::{CompliancePayload, RECORD_COMPLIANCE_SELECTOR, confidence_to_basis_points};
pub use poller::{DEFAULT_POLL_INTERVAL, PollHandle, spawn_poller};
pub use rpc::JsonRpcGateway;
pub use scripted::{ReceiptStep, ScriptedGateway};
pub use tracker::TransactionTracker;
