//! Concrete implementations of the domain ports.

pub mod md5_scheme;
