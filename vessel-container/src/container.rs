//! # The Container
//!
//! A string-keyed registry of parameters and service definitions with lazy,
//! optionally cached resolution.
//!
//! # Resolution
//! ```text
//! fetch(key) ──service?──> resolve(definition)
//!     │                        │ shared + cached ──> cached value
//!     │                        │ fetch(dep) for each dependency, in order
//!     │                        │ factory(args)
//!     │                        └ shared ──> cache[key] = value
//!     ├──parameter?──> stored value
//!     └──otherwise───> KeyNotFound
//! ```
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use vessel_container::prelude::*;
//!
//! struct Logger;
//! struct App {
//!     logger: Arc<Logger>,
//!     host: Arc<String>,
//! }
//!
//! let mut container = Container::new();
//! container.register_parameter("db.host", String::from("localhost"))?;
//! container.register_service("Logger", Service::new(|_| Ok(Logger)).tag("core"))?;
//! container.register_service(
//!     "App",
//!     Service::new(|args| {
//!         Ok(App {
//!             logger: args.get(0)?,
//!             host: args.get(1)?,
//!         })
//!     })
//!     .depends_on(["Logger", "db.host"]),
//! )?;
//!
//! let app: Arc<App> = container.fetch_as("App")?;
//! assert_eq!(app.host.as_str(), "localhost");
//! assert!(Arc::ptr_eq(&app, &container.fetch_as::<App>("App")?));
//! # Ok::<(), vessel_container::error::ContainerError>(())
//! ```

use std::any::type_name;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, trace};
use vessel_support::rendering::{ListingEntry, render_listing, suggest_similar};

use crate::config::ContainerConfig;
use crate::definition::{Arguments, Binding, Service, ServiceDefinition, Value};
use crate::error::{ContainerError, KeyNotFoundError, Result};
use crate::graph::{GraphValidator, ResolutionStack};
use crate::kind::EntryKind;
use crate::provider::{Provider, Registrar};
use crate::registry::Registry;

const MAX_SUGGESTIONS: usize = 3;

/// Dependency injection container.
///
/// Registration takes `&mut self`; fetching takes `&self` and fills the
/// instance cache through interior mutability. The container is `Send` but
/// not `Sync`: to share one across threads, guard it with a mutex.
pub struct Container {
    registry: Registry,
    cache: RefCell<HashMap<String, Value>>,
    resolving: ResolutionStack,
    config: ContainerConfig,
}

impl Container {
    /// Creates an empty container with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Creates an empty container with the given configuration.
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            registry: Registry::new(),
            cache: RefCell::new(HashMap::new()),
            resolving: ResolutionStack::new(),
            config,
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    // ── Registration ──

    /// Binds `name` to a parameter or a service.
    ///
    /// ```rust,ignore
    /// container.register("db.port", Binding::parameter(5432u16))?;
    /// container.register("Pool", Service::new(|args| Pool::open(args)))?;
    /// ```
    ///
    /// # Errors
    /// [`ContainerError::DuplicateKey`] if `name` is already registered,
    /// in which case nothing is changed.
    pub fn register(&mut self, name: impl Into<String>, binding: impl Into<Binding>) -> Result<()> {
        match binding.into() {
            Binding::Parameter(value) => self.register_value(name.into(), value),
            Binding::Service(service) => self.register_service(name, service),
        }
    }

    /// Registers a parameter. `value` is wrapped in an `Arc` once and the
    /// same `Arc` is returned by every fetch.
    pub fn register_parameter<T: Send + Sync + 'static>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> Result<()> {
        self.register_value(name.into(), Arc::new(value))
    }

    /// Registers a service definition.
    ///
    /// A service that did not choose `shared`/`transient` gets the
    /// configured default lifetime.
    pub fn register_service(&mut self, name: impl Into<String>, service: Service) -> Result<()> {
        let name = name.into();
        self.registry.ensure_unique(&name)?;

        let definition = service.into_definition(name, self.config.default_lifetime);
        self.registry.insert_definition(definition)
    }

    fn register_value(&mut self, name: String, value: Value) -> Result<()> {
        self.registry.insert_parameter(name, value)
    }

    /// Applies a [`Provider`] module.
    pub fn add_provider(&mut self, provider: &dyn Provider) -> Result<()> {
        info!(provider = provider.name(), "Applying provider");
        provider.register(self)
    }

    // ── Resolution ──

    /// Returns the value registered under `name`, constructing it if it is
    /// a service.
    ///
    /// # Errors
    /// - [`ContainerError::KeyNotFound`]: `name` is not registered, or one
    ///   of the dependencies of the service is not
    /// - [`ContainerError::CyclicDependency`]: the service depends on
    ///   itself (only with [`ContainerConfig::detect_cycles`])
    /// - any error returned by a factory, unchanged
    ///
    /// With cycle detection disabled, a cyclic dependency graph recurses
    /// until the thread's stack is exhausted. Keeping the graph acyclic is
    /// then the caller's job.
    #[instrument(skip(self), level = "trace")]
    pub fn fetch(&self, name: &str) -> Result<Value> {
        if let Some(definition) = self.registry.definition(name) {
            return self.resolve(definition);
        }

        if let Some(value) = self.registry.parameter(name) {
            trace!(key = name, "Parameter hit");
            return Ok(value.clone());
        }

        Err(ContainerError::KeyNotFound(KeyNotFoundError {
            key: name.to_string(),
            required_by: None,
            suggestions: self.find_suggestions(name),
        }))
    }

    /// Fetches `name` and downcasts it to `T`.
    ///
    /// Services are stored as the factory's return type, so a service built
    /// by `Service::new(|_| Ok(Logger))` is fetched as `fetch_as::<Logger>`.
    ///
    /// # Errors
    /// Everything [`fetch`](Self::fetch) returns, plus
    /// [`ContainerError::TypeMismatch`].
    pub fn fetch_as<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        self.fetch(name)?
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                key: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    fn resolve(&self, definition: &ServiceDefinition) -> Result<Value> {
        let name = definition.name();

        if definition.is_shared() {
            let cached = self.cache.borrow().get(name).cloned();
            if let Some(cached) = cached {
                trace!(key = name, "Cache hit");
                return Ok(cached);
            }
        }

        let _guard = if self.config.detect_cycles {
            Some(self.resolving.enter(name)?)
        } else {
            None
        };

        let mut values = Vec::with_capacity(definition.dependencies().len());
        for dependency in definition.dependencies() {
            let value = self.fetch(dependency).map_err(|err| match err {
                ContainerError::KeyNotFound(mut e)
                    if e.required_by.is_none() && e.key == *dependency =>
                {
                    e.required_by = Some(name.to_string());
                    ContainerError::KeyNotFound(e)
                }
                other => other,
            })?;
            values.push(value);
        }

        debug!(
            key = name,
            depth = self.resolving.depth(),
            lifetime = %definition.lifetime(),
            produces = definition.produces(),
            "Constructing service"
        );
        let args = Arguments::new(name, definition.dependencies(), values);
        let instance = definition.construct(&args)?;

        if definition.is_shared() {
            self.cache.borrow_mut().insert(name.to_string(), instance.clone());
        }

        Ok(instance)
    }

    // ── Tags ──

    /// Service definitions whose tag equals `tag`, in registration order.
    ///
    /// `None` selects the untagged definitions. No match is an empty list.
    ///
    /// ```rust,ignore
    /// let core = container.tagged_services("core");
    /// let untagged = container.tagged_services(None);
    /// ```
    pub fn tagged_services<'t>(&self, tag: impl Into<Option<&'t str>>) -> Vec<&ServiceDefinition> {
        let tag = tag.into();
        self.registry
            .definitions()
            .iter()
            .filter(|definition| definition.tag() == tag)
            .collect()
    }

    /// Fetches every service tagged `tag`, in registration order.
    pub fn resolve_tagged<'t>(&self, tag: impl Into<Option<&'t str>>) -> Result<Vec<Value>> {
        self.tagged_services(tag)
            .into_iter()
            .map(|definition| self.fetch(definition.name()))
            .collect()
    }

    // ── Introspection ──

    /// Returns `true` if `name` is registered in either registry.
    pub fn contains(&self, name: &str) -> bool {
        self.registry.kind_of(name).is_some()
    }

    /// Which registry holds `name`.
    pub fn kind_of(&self, name: &str) -> Option<EntryKind> {
        self.registry.kind_of(name)
    }

    /// Number of registered parameters and services.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Checks the whole registration graph without constructing anything.
    ///
    /// # Errors
    /// The first missing dependency ([`ContainerError::KeyNotFound`] with
    /// `required_by` set) or cycle ([`ContainerError::CyclicDependency`])
    /// found in registration order.
    pub fn validate(&self) -> Result<()> {
        GraphValidator::new(&self.registry).validate()
    }

    /// Renders every entry as an aligned listing.
    ///
    /// ```text
    /// [parameter] db.host
    /// [service]   Logger   (shared, tag: core)
    /// [service]   App      (shared, deps: Logger, db.host)
    /// ```
    pub fn describe(&self) -> String {
        let parameters = self.registry.parameter_keys().into_iter().map(|key| ListingEntry {
            kind: EntryKind::Parameter.to_string(),
            key: key.to_string(),
            detail: None,
        });

        let services = self.registry.definitions().iter().map(|definition| {
            let mut detail = definition.lifetime().to_string();
            if let Some(tag) = definition.tag() {
                detail.push_str(&format!(", tag: {tag}"));
            }
            if !definition.dependencies().is_empty() {
                detail.push_str(&format!(", deps: {}", definition.dependencies().join(", ")));
            }
            ListingEntry {
                kind: EntryKind::Service.to_string(),
                key: definition.name().to_string(),
                detail: Some(detail),
            }
        });

        render_listing(&parameters.chain(services).collect::<Vec<_>>())
    }

    fn find_suggestions(&self, key: &str) -> Vec<String> {
        suggest_similar(key, &self.registry.keys(), MAX_SUGGESTIONS)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Registrar for Container {
    fn bind(&mut self, name: &str, binding: Binding) -> Result<()> {
        self.register(name, binding)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.registry.len())
            .field("cached", &self.cache.borrow().len())
            .field("config", &self.config)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::Container;
    pub use crate::config::ContainerConfig;
    pub use crate::definition::{Arguments, Binding, Service, ServiceDefinition, Value};
    pub use crate::error::{ContainerError, Result};
    pub use crate::kind::EntryKind;
    pub use crate::lifetime::Lifetime;
    pub use crate::provider::{Provider, Registrar};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
