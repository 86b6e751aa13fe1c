//! Plugin handle contract and lifecycle state machine.
//!
//! A [`PluginHandle`] represents exactly one running deployment: reading
//! yields bytes from the plugin's standard output, writing feeds its standard
//! input, and closing tears the deployment down. The transport protocol
//! carried over the channel is opaque to this layer.
//!
//! Every handle moves through the lifecycle
//! `Deployed → Running → Closing → Closed`, with `Failed` reachable from any
//! non-terminal state when the underlying process exits unexpectedly or
//! shutdown fails. [`PluginStateCell`] is the shared lock-free implementation
//! of that state machine so all connectors agree on terminal-state semantics.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::DeployerError;

/// Lifecycle state of a single plugin deployment.
///
/// # Example
///
/// ```
/// use gantry_deployer::plugin::PluginState;
///
/// assert!(!PluginState::Running.is_terminal());
/// assert!(PluginState::Failed.is_terminal());
/// assert_eq!(PluginState::Closed.as_str(), "closed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PluginState {
    /// The deployment has been created but the transport is not yet ready.
    Deployed = 0,
    /// The transport is ready; read and write are permitted.
    Running = 1,
    /// Close has been requested; in-flight I/O is being terminated.
    Closing = 2,
    /// Shutdown completed; all resources are released.
    Closed = 3,
    /// The deployment died unexpectedly or shutdown failed.
    Failed = 4,
}

impl PluginState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deployed => "deployed",
            Self::Running => "running",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` for states that permit no further I/O and no
    /// resurrection.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }

    const fn decode(raw: u8) -> Self {
        match raw {
            0 => Self::Deployed,
            1 => Self::Running,
            2 => Self::Closing,
            3 => Self::Closed,
            _ => Self::Failed,
        }
    }
}

impl std::fmt::Display for PluginState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lock-free lifecycle cell enforcing legal plugin state transitions.
///
/// Connector implementations embed one cell per handle and route every
/// read, write, and close decision through it. The cell guarantees that
/// exactly one closer runs shutdown, that terminal states are never left,
/// and that I/O after close fails with a [`DeployerError::Terminal`] error
/// instead of blocking.
///
/// # Example
///
/// ```
/// use gantry_deployer::plugin::{PluginState, PluginStateCell};
///
/// let cell = PluginStateCell::new();
/// assert!(cell.mark_running());
/// assert!(cell.begin_close());
/// cell.finish_close(true);
/// assert_eq!(cell.state(), PluginState::Closed);
/// assert!(cell.ensure_live("inst-1").is_err());
/// ```
#[derive(Debug, Default)]
pub struct PluginStateCell {
    raw: AtomicU8,
}

impl PluginStateCell {
    /// Creates a cell in the `Deployed` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: AtomicU8::new(PluginState::Deployed as u8),
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PluginState {
        PluginState::decode(self.raw.load(Ordering::Acquire))
    }

    /// Transitions `Deployed → Running` once the transport is ready.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// handle was in any other state.
    pub fn mark_running(&self) -> bool {
        self.raw
            .compare_exchange(
                PluginState::Deployed as u8,
                PluginState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Claims the right to run shutdown, transitioning to `Closing`.
    ///
    /// Exactly one caller wins the claim from `Deployed` or `Running` and
    /// must follow up with [`PluginStateCell::finish_close`]. Callers that
    /// lose (the handle was already closing, closed, or failed) get `false`
    /// and must not touch the underlying resources.
    pub fn begin_close(&self) -> bool {
        for from in [PluginState::Running, PluginState::Deployed] {
            if self
                .raw
                .compare_exchange(
                    from as u8,
                    PluginState::Closing as u8,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                return true;
            }
        }
        false
    }

    /// Completes a close claimed via [`PluginStateCell::begin_close`].
    ///
    /// Moves `Closing → Closed` on success or `Closing → Failed` otherwise.
    /// The handle leaves `Closing` either way so callers are never
    /// deadlocked. No effect unless the cell is in `Closing`.
    pub fn finish_close(&self, success: bool) {
        let to = if success {
            PluginState::Closed
        } else {
            PluginState::Failed
        };
        drop(self.raw.compare_exchange(
            PluginState::Closing as u8,
            to as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ));
    }

    /// Records an unexpected death, transitioning any non-terminal state to
    /// `Failed`. A handle that already reached `Closed` stays `Closed`.
    pub fn fail(&self) {
        let mut current = self.raw.load(Ordering::Acquire);
        while !PluginState::decode(current).is_terminal() {
            match self.raw.compare_exchange(
                current,
                PluginState::Failed as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    /// Gate for read and write operations.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Terminal`] once the handle is closing,
    /// closed, or failed, so in-flight I/O terminates promptly instead of
    /// hanging.
    pub fn ensure_live(&self, instance: &str) -> Result<(), DeployerError> {
        let state = self.state();
        if matches!(state, PluginState::Closing) || state.is_terminal() {
            return Err(DeployerError::Terminal {
                instance: instance.to_owned(),
                state,
            });
        }
        Ok(())
    }
}

/// A live, bidirectional byte channel to one running plugin deployment.
///
/// Reads yield the plugin's standard output; writes feed its standard input.
/// The handle is owned by the caller once
/// [`Connector::deploy`](crate::connector::Connector::deploy) returns, and
/// the caller must eventually call [`PluginHandle::close`] to release the
/// underlying resources.
///
/// # Concurrency
///
/// All methods take `&self`: one reader and one writer may operate
/// concurrently without interference (protocol layers typically split the
/// duplex into separate read and write tasks). Multiple concurrent readers,
/// or multiple concurrent writers, require external synchronization by the
/// caller. `close` is safe to invoke concurrently with in-flight I/O; the
/// affected calls fail promptly with [`DeployerError::Terminal`] rather than
/// hanging.
///
/// # Lifecycle
///
/// `Deployed → Running → Closing → Closed`, with `Failed` terminal from any
/// point. Once closed or failed, every read and write returns
/// [`DeployerError::Terminal`]; a new deployment must be requested instead.
pub trait PluginHandle: Send + Sync {
    /// Stable identifier for this running instance, for logging and
    /// correlation.
    fn id(&self) -> &str;

    /// Reads bytes produced by the plugin's standard output into `buf`,
    /// returning the number of bytes read.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Terminal`] after close or failure, or
    /// [`DeployerError::Io`] if the channel breaks.
    fn read(&self, buf: &mut [u8]) -> Result<usize, DeployerError>;

    /// Writes bytes destined for the plugin's standard input, returning the
    /// number of bytes accepted.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Terminal`] after close or failure, or
    /// [`DeployerError::Io`] if the channel breaks.
    fn write(&self, buf: &[u8]) -> Result<usize, DeployerError>;

    /// Shuts the deployment down and releases all associated resources.
    ///
    /// Blocks until shutdown is confirmed complete or has failed. Closing an
    /// already-closed handle is a successful no-op; close never corrupts
    /// state however many times it is called.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::Shutdown`] if the underlying resource could
    /// not be cleanly terminated. The handle still leaves `Running` in that
    /// case, after best-effort reclamation.
    fn close(&self) -> Result<(), DeployerError>;
}

impl std::fmt::Debug for dyn PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle").field("id", &self.id()).finish()
    }
}
