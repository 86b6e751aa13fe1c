//! The connector contract: deploying a plugin source onto a target.
//!
//! A [`Connector`] is produced by a factory for one configuration and drives
//! deployments onto a specific target environment (a container runtime, a
//! remote cluster, a language interpreter). Connectors may be used for any
//! number of deploy calls; no teardown contract is defined at this layer.
//!
//! This crate deliberately exposes the broad contract: `deploy` takes a
//! generic plugin-source string (an image tag, a module path, anything the
//! deployer kind supports) and the resulting handle carries an instance
//! identifier. Context cancellation is a generic shutdown request observed
//! cooperatively, not a forced preemption.

use crate::context::DeploymentContext;
use crate::error::DeployerError;
use crate::plugin::PluginHandle;

/// Deploys plugin sources onto a specific target environment.
///
/// Implementations should be safe for concurrent `deploy` calls; any that
/// are not must document the restriction.
pub trait Connector: Send + Sync {
    /// Acquires the named plugin source and starts it, returning a live
    /// handle once the plugin is serving its transport protocol on its
    /// standard streams.
    ///
    /// The context governs the deployment's lifetime. Implementations check
    /// it at defined checkpoints: before resource acquisition, after
    /// startup, and while waiting for the transport to become ready. A
    /// context cancelled before acquisition means no resource may be
    /// created at all.
    ///
    /// # Errors
    ///
    /// - [`DeployerError::ShuttingDown`] if the context was already
    ///   cancelled; nothing is started.
    /// - [`DeployerError::Resolution`] if the plugin source cannot be
    ///   located or pulled.
    /// - [`DeployerError::Startup`] if the plugin starts but dies before
    ///   its transport is ready; partial deployments are cleaned up before
    ///   the error returns, leaking nothing.
    /// - [`DeployerError::Unimplemented`] from placeholder connectors.
    fn deploy(
        &self,
        ctx: &DeploymentContext,
        plugin_source: &str,
    ) -> Result<Box<dyn PluginHandle>, DeployerError>;
}

impl std::fmt::Debug for dyn Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Connector")
    }
}
