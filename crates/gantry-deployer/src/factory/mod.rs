//! Connector factories: typed and type-erased construction of deployers.
//!
//! A [`ConnectorFactory`] hides the complexity of instantiating a
//! [`Connector`]. It exposes a stable identifier, a [`DeploymentType`]
//! describing how its plugin sources are interpreted, and a configuration
//! schema, then builds connectors from validated configuration values.
//!
//! The typed trait gives compile-time-known callers type safety over the
//! configuration. Dynamic callers (a registry selecting among deployer kinds
//! at runtime) use [`AnyConnectorFactory`], which every typed factory gains
//! through the [`ErasedFactory`] adapter. The two forms behave identically
//! for the same underlying factory; the adapter only boxes and unboxes the
//! configuration value.

use std::borrow::Cow;

use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::connector::Connector;
use crate::error::DeployerError;

/// Tracing target for factory operations.
const FACTORY_TARGET: &str = "gantry_deployer::factory";

/// Classifies how a deployer kind interprets plugin-source strings.
///
/// Deployers sharing a deployment type accept the same shape of source
/// string: container deployers take image tags, module deployers take
/// interpreter module paths, and so on.
///
/// # Example
///
/// ```
/// use gantry_deployer::factory::DeploymentType;
///
/// assert_eq!(DeploymentType::IMAGE.as_str(), "image");
/// let custom = DeploymentType::new("wasm");
/// assert_ne!(custom, DeploymentType::IMAGE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentType(Cow<'static, str>);

impl DeploymentType {
    /// Plugin sources are container image tags.
    pub const IMAGE: Self = Self(Cow::Borrowed("image"));
    /// Plugin sources are interpreter module paths.
    pub const MODULE: Self = Self(Cow::Borrowed("module"));
    /// Placeholder type used by stub deployers in tests.
    pub const TEST: Self = Self(Cow::Borrowed("test"));

    /// Creates a deployment type with a custom name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds [`Connector`]s from a statically-known configuration type.
///
/// Factories are constructed once at process startup and live for the
/// process duration, producing zero or more connectors. `create` validates
/// the configuration and may probe target connectivity, but must never start
/// a deployment.
///
/// # Example
///
/// ```
/// use gantry_deployer::connector::Connector;
/// use gantry_deployer::context::DeploymentContext;
/// use gantry_deployer::error::DeployerError;
/// use gantry_deployer::factory::{ConnectorFactory, DeploymentType};
/// use gantry_deployer::plugin::PluginHandle;
///
/// #[derive(serde::Deserialize, schemars::JsonSchema)]
/// struct PodmanConfig {
///     binary: String,
/// }
///
/// struct PodmanConnector;
///
/// impl Connector for PodmanConnector {
///     fn deploy(
///         &self,
///         _ctx: &DeploymentContext,
///         _plugin_source: &str,
///     ) -> Result<Box<dyn PluginHandle>, DeployerError> {
///         Err(DeployerError::Unimplemented { connector: "podman".into() })
///     }
/// }
///
/// struct PodmanFactory;
///
/// impl ConnectorFactory for PodmanFactory {
///     type Config = PodmanConfig;
///
///     fn id(&self) -> &str {
///         "podman"
///     }
///
///     fn deployment_type(&self) -> DeploymentType {
///         DeploymentType::IMAGE
///     }
///
///     fn create(&self, _config: PodmanConfig) -> Result<Box<dyn Connector>, DeployerError> {
///         Ok(Box::new(PodmanConnector))
///     }
/// }
///
/// let schema = PodmanFactory.configuration_schema();
/// let json = serde_json::to_value(&schema).expect("schema serialises");
/// assert!(json["properties"]["binary"].is_object());
/// ```
pub trait ConnectorFactory: Send + Sync {
    /// Configuration shape accepted by this deployer kind.
    type Config: DeserializeOwned + JsonSchema + Send;

    /// Stable, unique identifier for the deployer kind
    /// (e.g. `"docker"`, `"kubernetes"`, `"python"`).
    fn id(&self) -> &str;

    /// Returns how this deployer interprets plugin-source strings.
    fn deployment_type(&self) -> DeploymentType;

    /// Describes the accepted configuration shape for external validation
    /// and documentation tooling.
    fn configuration_schema(&self) -> RootSchema {
        schemars::schema_for!(Self::Config)
    }

    /// Builds a ready-to-use connector from a validated configuration.
    ///
    /// May perform connectivity checks against the deployment target; must
    /// not start any deployment.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Configuration`] for malformed or unsupported
    /// configuration, or other [`DeployerError`] variants when the target is
    /// unreachable or credentials are invalid.
    fn create(&self, config: Self::Config) -> Result<Box<dyn Connector>, DeployerError>;
}

/// Object-safe, type-erased form of [`ConnectorFactory`].
///
/// Used where the configuration type is only known at runtime, such as a
/// registry dispatching on deployer IDs. Obtain one from any typed factory
/// via [`ErasedFactory`]; both forms behave identically.
pub trait AnyConnectorFactory: Send + Sync {
    /// Stable, unique identifier for the deployer kind.
    fn id(&self) -> &str;

    /// Returns how this deployer interprets plugin-source strings.
    fn deployment_type(&self) -> DeploymentType;

    /// Describes the accepted configuration shape.
    fn configuration_schema(&self) -> RootSchema;

    /// Builds a connector from an untyped configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Configuration`] if the value does not decode
    /// into the factory's configuration type, plus anything the typed
    /// `create` can return.
    fn create(&self, config: serde_json::Value) -> Result<Box<dyn Connector>, DeployerError>;
}

/// Adapter deriving [`AnyConnectorFactory`] from a typed factory.
///
/// The adapter decodes the untyped configuration value into the factory's
/// configuration type and delegates; construction logic is never duplicated
/// between the two forms.
///
/// # Example
///
/// ```
/// use gantry_deployer::factory::{AnyConnectorFactory, ConnectorFactory, ErasedFactory};
/// # use gantry_deployer::connector::Connector;
/// # use gantry_deployer::error::DeployerError;
/// # use gantry_deployer::factory::DeploymentType;
/// # #[derive(serde::Deserialize, schemars::JsonSchema)]
/// # struct NoConfig {}
/// # struct NullFactory;
/// # impl ConnectorFactory for NullFactory {
/// #     type Config = NoConfig;
/// #     fn id(&self) -> &str { "null" }
/// #     fn deployment_type(&self) -> DeploymentType { DeploymentType::TEST }
/// #     fn create(&self, _config: NoConfig) -> Result<Box<dyn Connector>, DeployerError> {
/// #         Err(DeployerError::Unimplemented { connector: "null".into() })
/// #     }
/// # }
///
/// let erased: Box<dyn AnyConnectorFactory> = Box::new(ErasedFactory::new(NullFactory));
/// assert_eq!(erased.id(), "null");
/// ```
#[derive(Debug)]
pub struct ErasedFactory<F> {
    inner: F,
}

impl<F> ErasedFactory<F> {
    /// Wraps a typed factory.
    #[must_use]
    pub const fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: ConnectorFactory> AnyConnectorFactory for ErasedFactory<F> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn deployment_type(&self) -> DeploymentType {
        self.inner.deployment_type()
    }

    fn configuration_schema(&self) -> RootSchema {
        self.inner.configuration_schema()
    }

    fn create(&self, config: serde_json::Value) -> Result<Box<dyn Connector>, DeployerError> {
        let typed =
            serde_json::from_value::<F::Config>(config).map_err(|err| {
                DeployerError::Configuration {
                    message: format!("deployer '{}' rejected the configuration: {err}", self.id()),
                    source: Some(err),
                }
            })?;

        debug!(
            target: FACTORY_TARGET,
            deployer = self.id(),
            "creating connector from erased configuration"
        );

        self.inner.create(typed)
    }
}
