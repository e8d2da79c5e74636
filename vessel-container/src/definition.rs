//! Service definitions and the values they produce.
//!
//! A [`Service`] is the builder you hand to the container; once registered
//! under a key it becomes a [`ServiceDefinition`]. Factories receive their
//! dependencies as positional [`Arguments`], in the order the dependency
//! keys were declared.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, ContainerError, Result};
use crate::lifetime::Lifetime;

/// A type-erased resolved value.
///
/// Parameters and service instances are both handed out as `Value`s.
/// Cloning a `Value` never clones the underlying object, so identity can
/// be checked with [`Arc::ptr_eq`].
pub type Value = Arc<dyn Any + Send + Sync>;

/// Type alias for factory functions.
///
/// # Why `Arc` and not `Box`?
/// Definitions are handed out by reference from
/// [`tagged_services`](crate::container::Container::tagged_services)
/// and may be cloned; `Arc` keeps the closure shared.
pub type FactoryFn = Arc<dyn Fn(&Arguments<'_>) -> Result<Value> + Send + Sync>;

/// Resolved dependencies handed to a factory.
pub struct Arguments<'a> {
    service: &'a str,
    dependencies: &'a [String],
    values: Vec<Value>,
}

impl<'a> Arguments<'a> {
    pub(crate) fn new(service: &'a str, dependencies: &'a [String], values: Vec<Value>) -> Self {
        Self {
            service,
            dependencies,
            values,
        }
    }

    /// Key of the service being constructed.
    pub fn service(&self) -> &str {
        self.service
    }

    /// Number of resolved dependencies.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the service declared no dependencies.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw value at `index`.
    ///
    /// # Errors
    /// [`ContainerError::MissingArgument`] if `index` is past the last
    /// declared dependency.
    pub fn value(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or_else(|| ContainerError::MissingArgument {
            service: self.service.to_string(),
            index,
            len: self.values.len(),
        })
    }

    /// The value at `index`, downcast to `T`.
    ///
    /// ```rust,ignore
    /// Service::new(|args| {
    ///     let logger: Arc<Logger> = args.get(0)?;
    ///     let host: Arc<String> = args.get(1)?;
    ///     Ok(App { logger, host })
    /// })
    /// .depends_on(["Logger", "db.host"])
    /// ```
    ///
    /// # Errors
    /// [`ContainerError::MissingArgument`] for an undeclared position,
    /// [`ContainerError::TypeMismatch`] naming the dependency key when the
    /// value is of another type.
    pub fn get<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>> {
        let value = self.value(index)?.clone();
        value.downcast::<T>().map_err(|_| ContainerError::TypeMismatch {
            key: self.dependencies.get(index).cloned().unwrap_or_default(),
            expected: type_name::<T>(),
        })
    }

    /// Wraps a factory's own failure for the service being constructed.
    ///
    /// ```rust,ignore
    /// Service::new(|args| {
    ///     let port: Arc<u16> = args.get(0)?;
    ///     Smtp::connect(*port).map_err(|e| args.fail(e))
    /// })
    /// ```
    pub fn fail(&self, source: impl Into<BoxError>) -> ContainerError {
        ContainerError::ConstructionFailed {
            key: self.service.to_string(),
            source: source.into(),
        }
    }
}

impl fmt::Debug for Arguments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("service", &self.service)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// Builder describing how to construct a service.
///
/// Register it with
/// [`Container::register_service`](crate::container::Container::register_service).
pub struct Service {
    factory: FactoryFn,
    produces: &'static str,
    dependencies: Vec<String>,
    tag: Option<String>,
    lifetime: Option<Lifetime>,
}

impl Service {
    /// Creates a service from a factory producing `T`.
    ///
    /// The container wraps the returned value in an `Arc`; fetch it back
    /// with [`fetch_as::<T>`](crate::container::Container::fetch_as).
    pub fn new<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Arguments<'_>) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(move |args: &Arguments<'_>| -> Result<Value> {
                Ok(Arc::new(factory(args)?))
            }),
            produces: type_name::<T>(),
            dependencies: Vec::new(),
            tag: None,
            lifetime: None,
        }
    }

    /// Declares the dependency keys, in positional-argument order.
    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches a grouping tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets the shared flag (`true` = cached, `false` = transient).
    pub fn shared(mut self, shared: bool) -> Self {
        self.lifetime = Some(Lifetime::from(shared));
        self
    }

    /// Shorthand for `.shared(false)`.
    pub fn transient(self) -> Self {
        self.shared(false)
    }

    pub(crate) fn into_definition(
        self,
        name: String,
        default_lifetime: Lifetime,
    ) -> ServiceDefinition {
        ServiceDefinition {
            name,
            factory: self.factory,
            produces: self.produces,
            dependencies: self.dependencies,
            tag: self.tag,
            lifetime: self.lifetime.unwrap_or(default_lifetime),
        }
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("produces", &self.produces)
            .field("dependencies", &self.dependencies)
            .field("tag", &self.tag)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// A registered service.
#[derive(Clone)]
pub struct ServiceDefinition {
    pub(crate) name: String,
    pub(crate) factory: FactoryFn,
    pub(crate) produces: &'static str,
    pub(crate) dependencies: Vec<String>,
    pub(crate) tag: Option<String>,
    pub(crate) lifetime: Lifetime,
}

impl ServiceDefinition {
    /// Key the service is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rust type name of what the factory builds.
    pub fn produces(&self) -> &'static str {
        self.produces
    }

    /// Dependency keys in positional-argument order.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn is_shared(&self) -> bool {
        self.lifetime.is_cached()
    }

    pub(crate) fn construct(&self, args: &Arguments<'_>) -> Result<Value> {
        (self.factory)(args)
    }
}

impl fmt::Debug for ServiceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDefinition")
            .field("name", &self.name)
            .field("produces", &self.produces)
            .field("dependencies", &self.dependencies)
            .field("tag", &self.tag)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// What a key is bound to.
///
/// The explicit choice between a plain value and a constructible service.
/// A callable stored as a [`Binding::Parameter`] stays a parameter: it is
/// returned as-is by `fetch`, never invoked.
pub enum Binding {
    /// A value stored verbatim.
    Parameter(Value),
    /// A service constructed on fetch.
    Service(Service),
}

impl Binding {
    /// Wraps `value` as a parameter.
    pub fn parameter<T: Send + Sync + 'static>(value: T) -> Self {
        Binding::Parameter(Arc::new(value))
    }
}

impl From<Service> for Binding {
    fn from(service: Service) -> Self {
        Binding::Service(service)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Parameter(_) => f.write_str("Binding::Parameter(..)"),
            Binding::Service(service) => f.debug_tuple("Binding::Service").field(service).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<'a>(deps: &'a [String], values: Vec<Value>) -> Arguments<'a> {
        Arguments::new("Subject", deps, values)
    }

    #[test]
    fn get_downcasts_positional_values() {
        let deps = vec!["port".to_string(), "host".to_string()];
        let args = args(
            &deps,
            vec![Arc::new(25u16) as Value, Arc::new(String::from("smtp")) as Value],
        );

        assert_eq!(*args.get::<u16>(0).unwrap(), 25);
        assert_eq!(args.get::<String>(1).unwrap().as_str(), "smtp");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn get_reports_type_mismatch_with_dependency_key() {
        let deps = vec!["port".to_string()];
        let args = args(&deps, vec![Arc::new(25u16) as Value]);

        match args.get::<String>(0).unwrap_err() {
            ContainerError::TypeMismatch { key, expected } => {
                assert_eq!(key, "port");
                assert!(expected.contains("String"));
            }
            other => panic!("Expected TypeMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_argument() {
        let args = args(&[], vec![]);
        assert!(args.is_empty());

        match args.get::<u16>(0).unwrap_err() {
            ContainerError::MissingArgument { service, index, len } => {
                assert_eq!(service, "Subject");
                assert_eq!(index, 0);
                assert_eq!(len, 0);
            }
            other => panic!("Expected MissingArgument, got: {other:?}"),
        }
    }

    #[test]
    fn service_builder_keeps_shared_flag() {
        let def = Service::new(|_| Ok(1u8))
            .depends_on(["a", "b"])
            .tag("core")
            .shared(false)
            .into_definition("One".into(), Lifetime::Shared);

        assert_eq!(def.name(), "One");
        assert_eq!(def.dependencies(), ["a", "b"]);
        assert_eq!(def.tag(), Some("core"));
        assert!(!def.is_shared());
        assert_eq!(def.produces(), "u8");
    }

    #[test]
    fn unset_lifetime_takes_default() {
        let def = Service::new(|_| Ok(1u8)).into_definition("One".into(), Lifetime::Transient);
        assert_eq!(def.lifetime(), Lifetime::Transient);
    }

    #[test]
    fn factory_result_is_wrapped_in_value() {
        let def = Service::new(|_| Ok(String::from("built")))
            .into_definition("S".into(), Lifetime::Shared);
        let value = def.construct(&args(&[], vec![])).unwrap();
        assert_eq!(value.downcast::<String>().unwrap().as_str(), "built");
    }
}
