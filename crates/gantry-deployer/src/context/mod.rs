//! Cancellable scope bounding the lifetime of deployments.
//!
//! A [`DeploymentContext`] wraps a [`CancellationToken`] and is passed into
//! every [`Connector::deploy`](crate::connector::Connector::deploy) call.
//! Cancellation is cooperative: connectors call
//! [`DeploymentContext::ensure_active`] at well-defined checkpoints (before
//! resource acquisition, after startup, while waiting for the transport to
//! become ready) rather than being preempted. Once cancelled, a context stays
//! cancelled and no new deployment may start under it.
//!
//! No timeout mechanism exists at this layer; callers compose deadlines by
//! cancelling the context themselves.

use tokio_util::sync::CancellationToken;

use crate::error::DeployerError;

/// Cancellable scope governing one or more deployments.
///
/// Contexts are cheap to clone; clones share the same cancellation state.
/// Use [`DeploymentContext::child`] for a scope that is cancelled with its
/// parent but can also be cancelled independently.
///
/// # Example
///
/// ```
/// use gantry_deployer::context::DeploymentContext;
///
/// let ctx = DeploymentContext::new();
/// assert!(ctx.ensure_active().is_ok());
///
/// ctx.cancel();
/// assert!(ctx.is_cancelled());
/// assert!(ctx.ensure_active().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeploymentContext {
    token: CancellationToken,
}

impl DeploymentContext {
    /// Creates a live, uncancelled context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown of everything governed by this context.
    ///
    /// Idempotent; cancelling an already-cancelled context has no effect.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the context has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cooperative cancellation checkpoint.
    ///
    /// Connectors call this before acquiring resources and between startup
    /// stages so a cancelled deployment stops without leaking anything.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::ShuttingDown`] once the context is cancelled.
    pub fn ensure_active(&self) -> Result<(), DeployerError> {
        if self.token.is_cancelled() {
            return Err(DeployerError::ShuttingDown);
        }
        Ok(())
    }

    /// Creates a child context.
    ///
    /// The child is cancelled whenever this context is cancelled, but
    /// cancelling the child leaves this context live. Useful for bounding a
    /// single deployment inside a wider shutdown scope.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }
}
