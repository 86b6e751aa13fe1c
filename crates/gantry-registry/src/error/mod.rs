//! Domain errors raised by registry operations.

use gantry_deployer::DeployerError;
use thiserror::Error;

/// Errors arising from deployer registration and lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No deployer is registered under the requested ID.
    #[error("no deployer registered under ID '{id}'")]
    UnknownDeployer {
        /// ID that was looked up.
        id: String,
    },

    /// A deployer with the same ID is already registered.
    #[error("a deployer is already registered under ID '{id}'")]
    DuplicateDeployer {
        /// ID of the rejected registration.
        id: String,
    },

    /// A factory operation failed; the underlying error is passed through
    /// unchanged.
    #[error(transparent)]
    Deployer(#[from] DeployerError),
}
