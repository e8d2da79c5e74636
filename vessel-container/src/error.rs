//! Error types for Vessel container operations.
//!
//! Every failure names the key involved, and the registry or chain that
//! caused it, so a bad bootstrap can be fixed from the message alone.

use std::fmt;

use vessel_support::rendering::render_chain;

use crate::kind::EntryKind;

/// Boxed error a factory can wrap into [`ContainerError::ConstructionFailed`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all Vessel operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// Key is already held by the parameter or the service registry.
    #[error("{}", .0)]
    DuplicateKey(DuplicateKeyError),

    /// Requested key exists in neither registry.
    #[error("{}", .0)]
    KeyNotFound(KeyNotFoundError),

    /// A service (transitively) depends on itself.
    #[error("{}", .0)]
    CyclicDependency(CyclicDependencyError),

    /// Value exists but is not of the requested type.
    #[error("Type mismatch for {key}: expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// A factory asked for a positional argument it never declared.
    #[error("Service {service} has no argument at position {index} ({len} dependencies declared)")]
    MissingArgument {
        service: String,
        index: usize,
        len: usize,
    },

    /// Factory reported a failure while building the service.
    #[error("Failed to construct {key}: {source}")]
    ConstructionFailed {
        key: String,
        #[source]
        source: BoxError,
    },
}

impl ContainerError {
    /// The key this error is about.
    pub fn key(&self) -> &str {
        match self {
            ContainerError::DuplicateKey(e) => &e.key,
            ContainerError::KeyNotFound(e) => &e.key,
            ContainerError::CyclicDependency(e) => e.chain.first().map_or("", String::as_str),
            ContainerError::TypeMismatch { key, .. } => key,
            ContainerError::MissingArgument { service, .. } => service,
            ContainerError::ConstructionFailed { key, .. } => key,
        }
    }
}

/// Error when a key is registered a second time.
#[derive(Debug)]
pub struct DuplicateKeyError {
    /// The key that was registered again
    pub key: String,
    /// Registry that already holds the key
    pub kind: EntryKind,
}

impl fmt::Display for DuplicateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key already registered as a {}: {}", self.kind, self.key)?;
        write!(f, "\n  Hint: Keys are write-once; register under a different name")
    }
}

/// Error when a key is not registered.
#[derive(Debug)]
pub struct KeyNotFoundError {
    /// The key that was requested
    pub key: String,
    /// Service whose dependency list named this key (if any)
    pub required_by: Option<String>,
    /// Registered keys that look similar
    pub suggestions: Vec<String>,
}

impl fmt::Display for KeyNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key not registered: {}", self.key)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  Required by: {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        Ok(())
    }
}

/// Error when resolution re-enters a service that is still being built.
#[derive(Debug)]
pub struct CyclicDependencyError {
    /// Keys from the first occurrence to the repeated one.
    /// Example: ["A", "B", "A"]
    pub chain: Vec<String>,
}

impl fmt::Display for CyclicDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cyclic dependency detected:\n  {}", render_chain(&self.chain))?;
        write!(
            f,
            "\n  Hint: Break the cycle by passing one side as a parameter"
        )
    }
}

/// Convenient Result type for Vessel operations.
pub type Result<T> = std::result::Result<T, ContainerError>;
