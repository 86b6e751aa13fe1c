//! Domain errors raised by deployment operations.
//!
//! All errors use `thiserror`-derived enums with structured context so
//! callers can inspect the failure programmatically. I/O errors are wrapped
//! in `Arc` to satisfy the `result_large_err` Clippy lint. Every failure mode
//! is an ordinary returned error; nothing at this layer panics.

use std::sync::Arc;

use thiserror::Error;

use crate::plugin::PluginState;

/// Errors arising from connector construction, deployment, and plugin I/O.
#[derive(Debug, Error)]
pub enum DeployerError {
    /// The configuration value supplied to a factory was invalid or
    /// unsupported. Surfaced immediately; never retried.
    #[error("invalid deployer configuration: {message}")]
    Configuration {
        /// Description of what was wrong with the configuration.
        message: String,
        /// Optional underlying decode error.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The plugin source could not be located or pulled during deployment.
    #[error("cannot resolve plugin source '{plugin_source}': {message}")]
    Resolution {
        /// Source string that failed to resolve.
        plugin_source: String,
        /// Description of the resolution failure.
        message: String,
    },

    /// The plugin started but failed before its transport became ready.
    /// Partially-started resources are torn down before this is returned.
    #[error("plugin '{plugin_source}' failed during startup: {message}")]
    Startup {
        /// Source string that was being deployed.
        plugin_source: String,
        /// Description of the startup failure.
        message: String,
        /// Optional underlying I/O error.
        #[source]
        source: Option<Arc<std::io::Error>>,
    },

    /// A deployment was requested on a cancelled context. No resources were
    /// acquired.
    #[error("deployer is shutting down; no new deployments may be started")]
    ShuttingDown,

    /// Close failed to cleanly terminate the underlying resource. The handle
    /// still leaves `Running` so callers are never deadlocked.
    #[error("plugin instance '{instance}' failed to shut down: {message}")]
    Shutdown {
        /// Identifier of the running instance.
        instance: String,
        /// Description of the shutdown failure.
        message: String,
    },

    /// I/O was attempted on a plugin handle that is closing, closed, or
    /// failed.
    #[error("plugin instance '{instance}' is {state}; no further I/O is possible")]
    Terminal {
        /// Identifier of the running instance.
        instance: String,
        /// Lifecycle state the handle was in.
        state: PluginState,
    },

    /// An I/O error occurred on the plugin's communication channel.
    #[error("I/O error on plugin instance '{instance}': {source}")]
    Io {
        /// Identifier of the running instance.
        instance: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A placeholder connector was asked to deploy. Stub connectors must
    /// report non-implementation rather than silently succeed.
    #[error("connector '{connector}' is not implemented")]
    Unimplemented {
        /// Identifier of the connector kind.
        connector: String,
    },
}
