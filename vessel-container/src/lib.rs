//! Core container implementation for Vessel DI.

pub mod config;
pub mod container;
pub mod definition;
pub mod error;
pub(crate) mod graph;
pub mod kind;
pub mod lifetime;
pub mod provider;
pub(crate) mod registry;

pub use config::ContainerConfig;
pub use container::{Container, prelude};
pub use definition::{Arguments, Binding, Service, ServiceDefinition, Value};
pub use error::{ContainerError, Result};
pub use kind::EntryKind;
pub use lifetime::Lifetime;
