//! Provider trait: a module of related registrations.
//!
//! Providers group the parameters and services of one concern together,
//! so application bootstrap reads as a list of modules instead of one long
//! block of `register_*` calls.
//!
//! # Examples
//! ```rust,ignore
//! struct MailProvider;
//!
//! impl Provider for MailProvider {
//!     fn register(&self, registrar: &mut dyn Registrar) -> Result<()> {
//!         registrar.bind("mail.port", Binding::parameter(25u16))?;
//!         registrar.bind(
//!             "Mailer",
//!             Service::new(|args| Ok(Mailer::new(*args.get::<u16>(0)?)))
//!                 .depends_on(["mail.port"])
//!                 .into(),
//!         )
//!     }
//! }
//! ```

use crate::definition::Binding;
use crate::error::Result;

/// A module that registers related entries into a container.
///
/// Applied with
/// [`Container::add_provider`](crate::container::Container::add_provider).
pub trait Provider {
    /// Register entries through `registrar`.
    ///
    /// Stops at the first failed registration; entries registered before
    /// it stay registered.
    fn register(&self, registrar: &mut dyn Registrar) -> Result<()>;

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Interface that providers register through.
///
/// Implemented by [`Container`](crate::container::Container); a separate
/// trait so providers can be tested without one.
pub trait Registrar {
    /// Bind `name` to a parameter or a service.
    ///
    /// # Errors
    /// [`ContainerError::DuplicateKey`](crate::error::ContainerError::DuplicateKey)
    /// if `name` is already registered.
    fn bind(&mut self, name: &str, binding: Binding) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Service;
    use crate::error::{ContainerError, DuplicateKeyError};
    use crate::kind::EntryKind;

    #[derive(Default)]
    struct MockRegistrar {
        parameters: Vec<String>,
        services: Vec<String>,
    }

    impl Registrar for MockRegistrar {
        fn bind(&mut self, name: &str, binding: Binding) -> Result<()> {
            if self.parameters.iter().chain(&self.services).any(|k| k == name) {
                return Err(ContainerError::DuplicateKey(DuplicateKeyError {
                    key: name.to_string(),
                    kind: EntryKind::Parameter,
                }));
            }
            match binding {
                Binding::Parameter(_) => self.parameters.push(name.to_string()),
                Binding::Service(_) => self.services.push(name.to_string()),
            }
            Ok(())
        }
    }

    struct MailProvider;

    impl Provider for MailProvider {
        fn register(&self, registrar: &mut dyn Registrar) -> Result<()> {
            registrar.bind("mail.port", Binding::parameter(25u16))?;
            registrar.bind(
                "Mailer",
                Service::new(|args| Ok(format!("smtp:{}", args.get::<u16>(0)?)))
                    .depends_on(["mail.port"])
                    .into(),
            )
        }
    }

    #[test]
    fn provider_binds_entries() {
        let mut registrar = MockRegistrar::default();
        MailProvider.register(&mut registrar).unwrap();

        assert_eq!(registrar.parameters, ["mail.port"]);
        assert_eq!(registrar.services, ["Mailer"]);
    }

    #[test]
    fn provider_stops_at_first_failure() {
        let mut registrar = MockRegistrar::default();
        registrar.parameters.push("mail.port".into());

        assert!(MailProvider.register(&mut registrar).is_err());
        assert!(registrar.services.is_empty());
    }

    #[test]
    fn provider_has_name() {
        assert!(MailProvider.name().contains("MailProvider"));
    }
}
