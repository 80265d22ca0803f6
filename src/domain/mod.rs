//! Domain layer: payload records, closed choice sets, validation messages and the
//! integrity port.

pub mod choices;
pub mod messages;
pub mod payloads;
pub mod ports;
