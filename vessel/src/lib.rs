//! # Vessel: a small dependency injection container for Rust
//!
//! Register parameters and service definitions under string keys, then
//! fetch them: services are built lazily from their dependencies and,
//! unless marked transient, cached for the life of the container.

pub use vessel_container::*;
pub use vessel_support::*;
