//! Container settings.
//!
//! [`ContainerConfig`] is plain data: build it in code with the setter
//! methods, or deserialize it from whatever configuration source the
//! application already uses. Missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::lifetime::Lifetime;

/// Settings applied by a [`Container`](crate::container::Container).
///
/// # Examples
/// ```
/// use vessel_container::config::ContainerConfig;
/// use vessel_container::lifetime::Lifetime;
///
/// let config = ContainerConfig::default()
///     .detect_cycles(false)
///     .default_lifetime(Lifetime::Transient);
///
/// assert!(!config.detect_cycles);
/// assert_eq!(config.default_lifetime, Lifetime::Transient);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Track in-progress resolutions and report re-entry as
    /// [`ContainerError::CyclicDependency`](crate::error::ContainerError::CyclicDependency).
    ///
    /// When disabled, a cyclic registration graph recurses without bound.
    pub detect_cycles: bool,

    /// Lifetime given to services whose builder did not choose one.
    pub default_lifetime: Lifetime,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            default_lifetime: Lifetime::Shared,
        }
    }
}

impl ContainerConfig {
    /// Enable or disable cycle detection.
    pub fn detect_cycles(mut self, detect: bool) -> Self {
        self.detect_cycles = detect;
        self
    }

    /// Set the lifetime used when a service does not pick one.
    pub fn default_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.default_lifetime = lifetime;
        self
    }
}
