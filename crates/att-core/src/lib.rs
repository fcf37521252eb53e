//! # att-core
//!
//! Core types and error types for attest.
//!
//! This crate provides the foundational types shared across all attest crates:
//! - The three pipeline artifacts (employee record, compliance verdict,
//!   blockchain transaction)
//! - Status enums with state machine transitions
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
