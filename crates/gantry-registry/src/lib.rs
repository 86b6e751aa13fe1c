//! Dynamic selection among deployer kinds for the gantry contract layer.
//!
//! The `gantry-registry` crate holds the runtime lookup table between stable
//! deployer IDs (`"docker"`, `"kubernetes"`, `"python"`, ...) and the
//! type-erased connector factories that build them. An orchestration engine
//! registers every factory it links against once at startup, then resolves
//! deployers by ID from workflow configuration: fetch the schema, validate
//! the configuration value, build the connector, deploy.
//!
//! # Example
//!
//! ```
//! use gantry_deployer::{AnyConnectorFactory, ErasedFactory};
//! use gantry_deployer::stub::StubFactory;
//! use gantry_registry::DeployerRegistry;
//!
//! let factories: Vec<Box<dyn AnyConnectorFactory>> = vec![
//!     Box::new(ErasedFactory::new(StubFactory::with_id("docker"))),
//!     Box::new(ErasedFactory::new(StubFactory::with_id("python"))),
//! ];
//! let registry = DeployerRegistry::with_factories(factories)
//!     .expect("distinct IDs register cleanly");
//!
//! assert_eq!(registry.ids(), vec!["docker", "python"]);
//! let connector = registry
//!     .create_connector("docker", serde_json::json!({}))
//!     .expect("configuration is valid");
//! # let _ = connector;
//! ```

pub mod error;
pub mod registry;

pub use self::error::RegistryError;
pub use self::registry::DeployerRegistry;
