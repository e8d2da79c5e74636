//! Dependency graph checks.
//!
//! Two tools live here:
//! - [`ResolutionStack`] tracks the services currently being built during a
//!   `fetch`, so re-entering one of them is reported as a cycle instead of
//!   recursing until the stack overflows.
//! - [`GraphValidator`] walks every definition ahead of time (on demand,
//!   there is no build phase) and reports missing dependencies and cycles
//!   without constructing anything.

use std::cell::RefCell;
use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::error::{ContainerError, CyclicDependencyError, KeyNotFoundError};
use crate::kind::EntryKind;
use crate::registry::Registry;

/// Keys of the services whose construction is in progress, outermost first.
#[derive(Debug, Default)]
pub(crate) struct ResolutionStack {
    path: RefCell<Vec<String>>,
}

impl ResolutionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `key`, failing if it is already being resolved.
    ///
    /// The returned guard pops the key when dropped, including when
    /// resolution bails out with an error.
    pub fn enter(&self, key: &str) -> Result<StackGuard<'_>, ContainerError> {
        let mut path = self.path.borrow_mut();

        if let Some(start) = path.iter().position(|k| k == key) {
            let mut chain: Vec<String> = path[start..].to_vec();
            chain.push(key.to_string());

            warn!(cycle = ?chain, "Cyclic dependency detected during fetch");
            return Err(ContainerError::CyclicDependency(CyclicDependencyError { chain }));
        }

        path.push(key.to_string());
        Ok(StackGuard { stack: self })
    }

    pub fn depth(&self) -> usize {
        self.path.borrow().len()
    }
}

/// Pops its key from the [`ResolutionStack`] on drop.
pub(crate) struct StackGuard<'a> {
    stack: &'a ResolutionStack,
}

impl Drop for StackGuard<'_> {
    fn drop(&mut self) {
        self.stack.path.borrow_mut().pop();
    }
}

/// Validates the registered definitions as a graph.
///
/// Checks performed:
/// 1. **Completeness**: every dependency key is registered
/// 2. **Acyclicity**: no service reaches itself through its dependencies
///
/// Shared services that capture a transient dependency are logged as a
/// warning: the transient instance is frozen into the cached service.
///
/// # Algorithm
/// Depth-first search in registration order, with a "visiting" set for
/// cycle detection and the current path for error reporting.
pub(crate) struct GraphValidator<'r> {
    registry: &'r Registry,
    visiting: HashSet<&'r str>,
    validated: HashSet<&'r str>,
    path: Vec<&'r str>,
}

impl<'r> GraphValidator<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            visiting: HashSet::new(),
            validated: HashSet::new(),
            path: Vec::new(),
        }
    }

    /// Validates every service definition.
    ///
    /// # Errors
    /// - [`ContainerError::CyclicDependency`]: cycle detected
    /// - [`ContainerError::KeyNotFound`]: a dependency is not registered
    #[instrument(skip(self), name = "graph_validation")]
    pub fn validate(&mut self) -> Result<(), ContainerError> {
        let registry = self.registry;
        debug!(
            services = registry.definitions().len(),
            "Starting dependency graph validation"
        );

        for definition in registry.definitions() {
            self.validate_key(definition.name())?;
        }

        debug!("Dependency graph validation passed");
        Ok(())
    }

    fn validate_key(&mut self, key: &'r str) -> Result<(), ContainerError> {
        if self.validated.contains(key) {
            return Ok(());
        }

        if self.visiting.contains(key) {
            let start = self.path.iter().position(|k| *k == key).unwrap_or(0);
            let mut chain: Vec<String> = self.path[start..].iter().map(|k| k.to_string()).collect();
            chain.push(key.to_string());

            warn!(cycle = ?chain, "Cyclic dependency detected");
            return Err(ContainerError::CyclicDependency(CyclicDependencyError { chain }));
        }

        let registry = self.registry;
        let definition = match registry.kind_of(key) {
            Some(EntryKind::Parameter) => {
                self.validated.insert(key);
                return Ok(());
            }
            Some(EntryKind::Service) => registry.definition(key),
            None => None,
        };

        let Some(definition) = definition else {
            let required_by = self.path.last().map(|k| k.to_string());
            warn!(key, required_by = ?required_by, "Missing dependency");
            return Err(ContainerError::KeyNotFound(KeyNotFoundError {
                key: key.to_string(),
                required_by,
                suggestions: Vec::new(),
            }));
        };

        self.visiting.insert(key);
        self.path.push(key);

        for dependency in definition.dependencies() {
            let captures_transient = definition.is_shared()
                && registry
                    .definition(dependency)
                    .is_some_and(|dep| !dep.is_shared());
            if captures_transient {
                warn!(
                    consumer = key,
                    dependency = dependency.as_str(),
                    "Shared service captures a transient dependency"
                );
            }

            self.validate_key(dependency)?;
        }

        self.path.pop();
        self.visiting.remove(key);
        self.validated.insert(key);

        Ok(())
    }
}
