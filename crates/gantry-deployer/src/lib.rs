//! Contracts for deploying plugins onto pluggable execution targets.
//!
//! The `gantry-deployer` crate defines the abstraction layer between an
//! orchestration engine and the machinery that runs its plugins: external
//! processes or containers speaking an opaque streaming protocol over their
//! standard streams. Three roles make up the contract:
//!
//! - A [`ConnectorFactory`] builds a connector from schema-described
//!   configuration. The typed trait serves compile-time-known callers; the
//!   [`AnyConnectorFactory`] form, derived through [`ErasedFactory`], serves
//!   dynamic registries.
//! - A [`Connector`] deploys a plugin-source string (image tag, module path,
//!   anything the deployer kind supports) under a cancellable
//!   [`DeploymentContext`] and yields a live handle.
//! - A [`PluginHandle`] is the running instance: reads drain the plugin's
//!   stdout, writes feed its stdin, and close tears the deployment down.
//!   Handles follow the `Deployed → Running → Closing → Closed` lifecycle
//!   enforced by [`PluginStateCell`], with `Failed` terminal from any point.
//!
//! Concrete connectors (container runtimes, process spawners) live in their
//! own crates; this crate ships only the contracts plus stub and loopback
//! connectors (feature `test-support`) for exercising them.
//!
//! # Example
//!
//! A deliberately-unimplemented deployer, the minimal shape every concrete
//! connector crate fills in:
//!
//! ```
//! use gantry_deployer::{
//!     Connector, ConnectorFactory, DeploymentContext, DeploymentType, DeployerError,
//!     PluginHandle,
//! };
//!
//! #[derive(serde::Deserialize, schemars::JsonSchema)]
//! struct TestConfig {}
//!
//! struct TestConnector;
//!
//! impl Connector for TestConnector {
//!     fn deploy(
//!         &self,
//!         _ctx: &DeploymentContext,
//!         _plugin_source: &str,
//!     ) -> Result<Box<dyn PluginHandle>, DeployerError> {
//!         Err(DeployerError::Unimplemented { connector: "test".into() })
//!     }
//! }
//!
//! struct TestFactory;
//!
//! impl ConnectorFactory for TestFactory {
//!     type Config = TestConfig;
//!
//!     fn id(&self) -> &str {
//!         "test"
//!     }
//!
//!     fn deployment_type(&self) -> DeploymentType {
//!         DeploymentType::TEST
//!     }
//!
//!     fn create(&self, _config: TestConfig) -> Result<Box<dyn Connector>, DeployerError> {
//!         Ok(Box::new(TestConnector))
//!     }
//! }
//!
//! let connector = TestFactory.create(TestConfig {}).expect("create succeeds");
//! let err = connector
//!     .deploy(&DeploymentContext::new(), "unused-source")
//!     .expect_err("the stub reports non-implementation");
//! assert!(matches!(err, DeployerError::Unimplemented { .. }));
//! ```

pub mod connector;
pub mod context;
pub mod error;
pub mod factory;
pub mod plugin;

#[cfg(any(test, feature = "test-support"))]
pub mod stub;

#[cfg(test)]
mod tests;

pub use self::connector::Connector;
pub use self::context::DeploymentContext;
pub use self::error::DeployerError;
pub use self::factory::{AnyConnectorFactory, ConnectorFactory, DeploymentType, ErasedFactory};
pub use self::plugin::{PluginHandle, PluginState, PluginStateCell};
