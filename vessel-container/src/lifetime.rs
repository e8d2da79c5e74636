//! Service lifetimes.
//!
//! A lifetime decides whether a resolved service is reused:
//! - [`Lifetime::Shared`]: built once, then served from the instance cache
//! - [`Lifetime::Transient`]: built again on every fetch
use std::fmt;

use serde::{Deserialize, Serialize};

/// Defines how long a resolved service lives within the container.
///
/// # Examples
/// ```
/// use vessel_container::lifetime::Lifetime;
///
/// assert_eq!(Lifetime::default(), Lifetime::Shared);
/// assert_eq!(Lifetime::from(false), Lifetime::Transient);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// One instance per container.
    ///
    /// Created on first fetch, cached until the container is dropped.
    /// Later fetches never re-run the factory or re-fetch dependencies.
    #[default]
    Shared,

    /// New instance on every fetch.
    ///
    /// Never cached. Dependencies are fetched again each time.
    Transient,
}

impl Lifetime {
    /// Returns `true` if resolved instances are kept in the cache.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Lifetime::Shared)
    }
}

impl From<bool> for Lifetime {
    /// `true` is [`Lifetime::Shared`], `false` is [`Lifetime::Transient`].
    fn from(shared: bool) -> Self {
        if shared {
            Lifetime::Shared
        } else {
            Lifetime::Transient
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Shared => write!(f, "shared"),
            Lifetime::Transient => write!(f, "transient"),
        }
    }
}
