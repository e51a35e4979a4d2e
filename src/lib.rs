//! Affordability scoring for salary-backed lending.
//!
//! [`scoring`] holds the pure engine; [`linking`] wires it to a bank-data
//! provider, borrower storage and the audit log.

pub mod config;
pub mod error;
pub mod linking;
pub mod scoring;
pub mod telemetry;

pub use scoring::{
    calculate_affordability, AffordabilityEngine, AffordabilityResult, ScoringPolicy, Transaction,
    TransactionDirection,
};
