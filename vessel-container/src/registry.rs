//! Entry registry: the parameter and service-definition maps.
//!
//! The two maps share one key space: a key lives in at most one of them,
//! and once it is in, it stays there.

use std::collections::HashMap;

use tracing::debug;

use crate::definition::{ServiceDefinition, Value};
use crate::error::{ContainerError, DuplicateKeyError};
use crate::kind::EntryKind;

/// Stores all registered entries.
///
/// Service definitions are kept in registration order so tag lookups
/// return them in the order they were added.
#[derive(Default)]
pub(crate) struct Registry {
    parameters: HashMap<String, Value>,
    definitions: Vec<ServiceDefinition>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if either registry already holds `name`.
    ///
    /// # Errors
    /// Returns [`ContainerError::DuplicateKey`] naming the registry that
    /// holds the key.
    pub fn ensure_unique(&self, name: &str) -> Result<(), ContainerError> {
        match self.kind_of(name) {
            Some(kind) => Err(ContainerError::DuplicateKey(DuplicateKeyError {
                key: name.to_string(),
                kind,
            })),
            None => Ok(()),
        }
    }

    /// Stores a parameter value verbatim.
    pub fn insert_parameter(&mut self, name: String, value: Value) -> Result<(), ContainerError> {
        self.ensure_unique(&name)?;

        debug!(key = %name, "Registered parameter");
        self.parameters.insert(name, value);
        Ok(())
    }

    /// Stores a service definition under its own name.
    pub fn insert_definition(
        &mut self,
        definition: ServiceDefinition,
    ) -> Result<(), ContainerError> {
        self.ensure_unique(&definition.name)?;

        debug!(
            key = %definition.name,
            lifetime = %definition.lifetime,
            tag = ?definition.tag,
            dependencies = ?definition.dependencies,
            "Registered service"
        );
        self.index.insert(definition.name.clone(), self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Which registry holds `name`, if any.
    pub fn kind_of(&self, name: &str) -> Option<EntryKind> {
        if self.parameters.contains_key(name) {
            Some(EntryKind::Parameter)
        } else if self.index.contains_key(name) {
            Some(EntryKind::Service)
        } else {
            None
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    pub fn definition(&self, name: &str) -> Option<&ServiceDefinition> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    /// All definitions, in registration order.
    pub fn definitions(&self) -> &[ServiceDefinition] {
        &self.definitions
    }

    /// Parameter keys, sorted.
    pub fn parameter_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.parameters.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Every registered key: parameters sorted, then services in order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = self.parameter_keys();
        keys.extend(self.definitions.iter().map(|d| d.name.as_str()));
        keys
    }

    /// Returns the number of registered entries.
    pub fn len(&self) -> usize {
        self.parameters.len() + self.definitions.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Service;
    use crate::lifetime::Lifetime;
    use std::sync::Arc;

    fn definition(name: &str) -> ServiceDefinition {
        Service::new(|_| Ok(42i32)).into_definition(name.to_string(), Lifetime::Shared)
    }

    fn value() -> Value {
        Arc::new(String::from("localhost"))
    }

    #[test]
    fn register_and_get() {
        let mut reg = Registry::new();
        reg.insert_parameter("db.host".into(), value()).unwrap();
        reg.insert_definition(definition("Database")).unwrap();

        assert!(reg.parameter("db.host").is_some());
        assert!(reg.definition("Database").is_some());
        assert_eq!(reg.kind_of("db.host"), Some(EntryKind::Parameter));
        assert_eq!(reg.kind_of("Database"), Some(EntryKind::Service));
        assert_eq!(reg.kind_of("missing"), None);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn duplicate_across_registries_fails() {
        let mut reg = Registry::new();
        reg.insert_parameter("shared.key".into(), value()).unwrap();

        match reg.insert_definition(definition("shared.key")).unwrap_err() {
            ContainerError::DuplicateKey(e) => assert_eq!(e.kind, EntryKind::Parameter),
            other => panic!("Expected DuplicateKey, got: {other:?}"),
        }
        assert!(reg.definition("shared.key").is_none());
        assert!(reg.definitions().is_empty());
    }

    #[test]
    fn duplicate_service_reports_service_kind() {
        let mut reg = Registry::new();
        reg.insert_definition(definition("Database")).unwrap();

        match reg.insert_parameter("Database".into(), value()).unwrap_err() {
            ContainerError::DuplicateKey(e) => {
                assert_eq!(e.key, "Database");
                assert_eq!(e.kind, EntryKind::Service);
            }
            other => panic!("Expected DuplicateKey, got: {other:?}"),
        }
        assert!(reg.parameter("Database").is_none());
    }

    #[test]
    fn definitions_keep_registration_order() {
        let mut reg = Registry::new();
        for name in ["c", "a", "b"] {
            reg.insert_definition(definition(name)).unwrap();
        }

        let names: Vec<&str> = reg.definitions().iter().map(ServiceDefinition::name).collect();
        assert_eq!(names, ["c", "a", "b"]);
        assert_eq!(reg.definition("a").map(ServiceDefinition::name), Some("a"));
    }

    #[test]
    fn keys_list_parameters_then_services() {
        let mut reg = Registry::new();
        reg.insert_definition(definition("Mailer")).unwrap();
        reg.insert_parameter("z.last".into(), value()).unwrap();
        reg.insert_parameter("a.first".into(), value()).unwrap();

        assert_eq!(reg.keys(), ["a.first", "z.last", "Mailer"]);
    }
}
