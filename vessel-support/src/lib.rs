//! # Vessel Support
//!
//! Shared utilities for the Vessel DI container.
//!
//! This crate provides:
//! - Text rendering for error messages and container listings
//! - "Did you mean?" suggestions for unknown keys

pub mod rendering;
