//! Validation and integrity layer for the IntellectMoney hosted payment gateway.
//!
//! Three interactions are covered, all through [`application::gateway::IntellectMoney`]:
//!
//! - building an outgoing payment request (defaults, hold-mode expiry, signing),
//! - validating an asynchronous payment-result callback (hash or secret-key mode),
//! - validating an administrative accept/refund action.
//!
//! Validation is synchronous and side-effect free; configuration is read-only.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
