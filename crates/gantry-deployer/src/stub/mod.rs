//! Stub and loopback connectors for contract testing.
//!
//! [`StubFactory`] mirrors the canonical placeholder deployer: an empty
//! configuration schema and a connector whose `deploy` always reports
//! non-implementation. [`LoopbackConnector`] goes one step further and
//! produces a live in-memory duplex handle, so the full
//! deploy/read/write/close lifecycle can be exercised without spawning any
//! process or container.
//!
//! Available to downstream crates via the `test-support` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use crate::connector::Connector;
use crate::context::DeploymentContext;
use crate::error::DeployerError;
use crate::factory::{ConnectorFactory, DeploymentType};
use crate::plugin::{PluginHandle, PluginStateCell};

/// Tracing target for stub connector operations.
const STUB_TARGET: &str = "gantry_deployer::stub";

/// Empty configuration accepted by the stub deployer.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StubConfig {}

/// Factory for a deliberately-unimplemented deployer kind.
///
/// # Example
///
/// ```
/// use gantry_deployer::context::DeploymentContext;
/// use gantry_deployer::error::DeployerError;
/// use gantry_deployer::factory::ConnectorFactory;
/// use gantry_deployer::stub::{StubConfig, StubFactory};
///
/// let connector = StubFactory::new()
///     .create(StubConfig::default())
///     .expect("stub create succeeds");
/// let err = connector
///     .deploy(&DeploymentContext::new(), "unused-source")
///     .expect_err("stub deploy reports non-implementation");
/// assert!(matches!(err, DeployerError::Unimplemented { .. }));
/// ```
#[derive(Debug, Clone)]
pub struct StubFactory {
    id: &'static str,
}

impl Default for StubFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl StubFactory {
    /// Creates the canonical stub factory with ID `"test"`.
    #[must_use]
    pub const fn new() -> Self {
        Self { id: "test" }
    }

    /// Creates a stub factory with a custom ID, for registry tests that need
    /// several distinct deployer kinds.
    #[must_use]
    pub const fn with_id(id: &'static str) -> Self {
        Self { id }
    }
}

impl ConnectorFactory for StubFactory {
    type Config = StubConfig;

    fn id(&self) -> &str {
        self.id
    }

    fn deployment_type(&self) -> DeploymentType {
        DeploymentType::TEST
    }

    fn create(&self, _config: StubConfig) -> Result<Box<dyn Connector>, DeployerError> {
        Ok(Box::new(StubConnector { id: self.id }))
    }
}

/// Connector whose `deploy` always fails with a non-implementation error and
/// yields no handle.
#[derive(Debug)]
pub struct StubConnector {
    id: &'static str,
}

impl Connector for StubConnector {
    fn deploy(
        &self,
        _ctx: &DeploymentContext,
        _plugin_source: &str,
    ) -> Result<Box<dyn PluginHandle>, DeployerError> {
        Err(DeployerError::Unimplemented {
            connector: self.id.to_owned(),
        })
    }
}

/// In-memory connector whose deployments echo written bytes back to the
/// reader.
///
/// The connector counts how many deployments actually acquired their
/// backing resources, so tests can assert that a cancelled context starts
/// nothing.
#[derive(Debug, Default)]
pub struct LoopbackConnector {
    deployments: Arc<AtomicUsize>,
}

impl LoopbackConnector {
    /// Creates a loopback connector with no deployments yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of deployments that acquired resources over the connector's
    /// lifetime.
    #[must_use]
    pub fn deployment_count(&self) -> usize {
        self.deployments.load(Ordering::SeqCst)
    }
}

impl Connector for LoopbackConnector {
    fn deploy(
        &self,
        ctx: &DeploymentContext,
        plugin_source: &str,
    ) -> Result<Box<dyn PluginHandle>, DeployerError> {
        // Checkpoint before any resource acquisition.
        ctx.ensure_active()?;

        if plugin_source.is_empty() {
            return Err(DeployerError::Resolution {
                plugin_source: plugin_source.to_owned(),
                message: String::from("plugin source must not be empty"),
            });
        }

        let sequence = self.deployments.fetch_add(1, Ordering::SeqCst) + 1;
        let plugin = LoopbackPlugin::new(format!("loopback-{sequence}"));

        // Checkpoint after startup: a shutdown requested mid-deploy tears the
        // instance down before the error returns.
        if let Err(err) = ctx.ensure_active() {
            drop(plugin.close());
            return Err(err);
        }

        debug!(
            target: STUB_TARGET,
            instance = plugin.id.as_str(),
            plugin_source,
            "loopback deployment ready"
        );

        Ok(Box::new(plugin))
    }
}

/// In-memory plugin handle backed by a byte queue instead of a process.
///
/// Writes append to the queue; reads drain it. The handle is driven through
/// [`PluginStateCell`], giving it the exact terminal-state behaviour the
/// contract demands from real connectors.
#[derive(Debug)]
pub struct LoopbackPlugin {
    id: String,
    state: PluginStateCell,
    buffer: Mutex<VecDeque<u8>>,
}

impl LoopbackPlugin {
    fn new(id: String) -> Self {
        let plugin = Self {
            id,
            state: PluginStateCell::new(),
            buffer: Mutex::new(VecDeque::new()),
        };
        // The in-memory transport is ready the moment it exists.
        plugin.state.mark_running();
        plugin
    }
}

impl PluginHandle for LoopbackPlugin {
    fn id(&self) -> &str {
        &self.id
    }

    fn read(&self, buf: &mut [u8]) -> Result<usize, DeployerError> {
        self.state.ensure_live(&self.id)?;
        let mut queue = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut count = 0;
        for slot in buf.iter_mut() {
            let Some(byte) = queue.pop_front() else {
                break;
            };
            *slot = byte;
            count += 1;
        }
        Ok(count)
    }

    fn write(&self, buf: &[u8]) -> Result<usize, DeployerError> {
        self.state.ensure_live(&self.id)?;
        let mut queue = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        queue.extend(buf.iter().copied());
        Ok(buf.len())
    }

    fn close(&self) -> Result<(), DeployerError> {
        if self.state.begin_close() {
            let mut queue = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
            queue.clear();
            self.state.finish_close(true);
            debug!(target: STUB_TARGET, instance = self.id.as_str(), "loopback instance closed");
        }
        // Repeated closes are a successful no-op.
        Ok(())
    }
}
