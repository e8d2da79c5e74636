//! Registry kinds.
//!
//! Every key in a [`Container`](crate::container::Container) belongs to
//! exactly one registry, identified by [`EntryKind`]. A key never changes
//! its kind once registered.

use std::fmt;

/// Which registry holds a key.
///
/// # Examples
/// ```
/// use vessel_container::kind::EntryKind;
///
/// assert_eq!(EntryKind::Parameter.to_string(), "parameter");
/// assert_eq!(EntryKind::Service.to_string(), "service");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A plain value stored verbatim.
    Parameter,
    /// A service definition resolved through its factory.
    Service,
}

impl EntryKind {
    /// Lowercase label used in diagnostics and listings.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Parameter => "parameter",
            EntryKind::Service => "service",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
