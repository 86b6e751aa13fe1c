//! Registry mapping deployer IDs to type-erased connector factories.
//!
//! The [`DeployerRegistry`] is how an orchestration engine selects among
//! deployer kinds at runtime: factories are registered once at startup under
//! their stable IDs, then looked up by ID to validate configuration and
//! build connectors. Registered factories are fully independent; nothing is
//! shared between deployer kinds.

use std::collections::{BTreeMap, HashMap};

use schemars::schema::RootSchema;
use tracing::debug;

use gantry_deployer::factory::DeploymentType;
use gantry_deployer::{AnyConnectorFactory, Connector};

use crate::error::RegistryError;

/// Tracing target for registry operations.
const REGISTRY_TARGET: &str = "gantry_registry::registry";

/// Registry of connector factories keyed by deployer ID.
///
/// # Example
///
/// ```
/// use gantry_deployer::ErasedFactory;
/// use gantry_deployer::stub::StubFactory;
/// use gantry_registry::DeployerRegistry;
///
/// let mut registry = DeployerRegistry::new();
/// registry
///     .register(Box::new(ErasedFactory::new(StubFactory::new())))
///     .expect("registration succeeds");
///
/// let factory = registry.get("test").expect("factory is retrievable");
/// let connector = factory
///     .create(serde_json::json!({}))
///     .expect("empty configuration is valid");
/// # let _ = connector;
/// ```
#[derive(Default)]
pub struct DeployerRegistry {
    factories: HashMap<String, Box<dyn AnyConnectorFactory>>,
}

impl std::fmt::Debug for DeployerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployerRegistry")
            .field("deployers", &self.ids())
            .finish()
    }
}

impl DeployerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a collection of factories.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateDeployer`] if two factories share
    /// an ID.
    pub fn with_factories(
        factories: impl IntoIterator<Item = Box<dyn AnyConnectorFactory>>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for factory in factories {
            registry.register(factory)?;
        }
        Ok(registry)
    }

    /// Registers a factory under its own ID.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateDeployer`] if a factory with the
    /// same ID is already registered.
    pub fn register(&mut self, factory: Box<dyn AnyConnectorFactory>) -> Result<(), RegistryError> {
        let id = factory.id().to_owned();
        if self.factories.contains_key(&id) {
            return Err(RegistryError::DuplicateDeployer { id });
        }

        debug!(
            target: REGISTRY_TARGET,
            deployer = id.as_str(),
            deployment_type = factory.deployment_type().as_str(),
            "registering deployer"
        );

        self.factories.insert(id, factory);
        Ok(())
    }

    /// Looks up a factory by deployer ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn AnyConnectorFactory> {
        self.factories.get(id).map(Box::as_ref)
    }

    /// Returns all factories sharing a deployment type.
    #[must_use]
    pub fn find_by_deployment_type(
        &self,
        deployment_type: &DeploymentType,
    ) -> Vec<&dyn AnyConnectorFactory> {
        self.factories
            .values()
            .filter(|factory| factory.deployment_type() == *deployment_type)
            .map(Box::as_ref)
            .collect()
    }

    /// Returns the registered deployer IDs in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the configuration schema of every registered deployer, keyed
    /// by ID, for validation and documentation tooling.
    #[must_use]
    pub fn configuration_schemas(&self) -> BTreeMap<String, RootSchema> {
        self.factories
            .iter()
            .map(|(id, factory)| (id.clone(), factory.configuration_schema()))
            .collect()
    }

    /// Builds a connector from the named deployer and an untyped
    /// configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDeployer`] if no factory carries the
    /// ID, or passes through the factory's own construction error.
    pub fn create_connector(
        &self,
        id: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn Connector>, RegistryError> {
        let factory = self
            .get(id)
            .ok_or_else(|| RegistryError::UnknownDeployer { id: id.to_owned() })?;

        debug!(target: REGISTRY_TARGET, deployer = id, "creating connector");
        Ok(factory.create(config)?)
    }

    /// Returns the number of registered deployers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` when no deployers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests;
