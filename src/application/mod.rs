//! Application layer: the table-driven validation engine and the three payload
//! validators built on it.
//!
//! [`gateway::IntellectMoney`] is the entry point. It owns the merchant settings and
//! the hash scheme and exposes one operation per interaction with the gateway:
//! building a payment request, validating a payment-result callback and validating
//! an administrative action.

pub mod admin;
pub mod fields;
pub mod form;
pub mod gateway;
pub mod request;
pub mod result;
