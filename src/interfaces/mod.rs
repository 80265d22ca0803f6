//! Adapters between the validators and the outside world: CSV batches in,
//! CSV reports and JSON lines out.

pub mod csv;
pub mod json;
