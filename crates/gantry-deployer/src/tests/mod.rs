//! Crate-level integration tests for the deployment contracts.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::connector::Connector;
use crate::context::DeploymentContext;
use crate::error::DeployerError;
use crate::factory::{AnyConnectorFactory, ConnectorFactory, DeploymentType, ErasedFactory};
use crate::plugin::PluginHandle;
use crate::stub::LoopbackConnector;

/// Configuration for the in-memory loopback deployer used in these tests.
#[derive(Debug, Deserialize, JsonSchema)]
struct LoopbackConfig {
    /// Upper bound on live instances; `0` disables the connector.
    max_instances: u32,
}

struct LoopbackFactory;

impl ConnectorFactory for LoopbackFactory {
    type Config = LoopbackConfig;

    fn id(&self) -> &str {
        "loopback"
    }

    fn deployment_type(&self) -> DeploymentType {
        DeploymentType::TEST
    }

    fn create(&self, config: LoopbackConfig) -> Result<Box<dyn Connector>, DeployerError> {
        if config.max_instances == 0 {
            return Err(DeployerError::Configuration {
                message: String::from("max_instances must be at least 1"),
                source: None,
            });
        }
        Ok(Box::new(LoopbackConnector::new()))
    }
}

fn deploy_and_echo(plugin: &dyn PluginHandle) {
    plugin.write(b"ping").expect("write");
    let mut buf = [0_u8; 8];
    let read = plugin.read(&mut buf).expect("read");
    assert_eq!(buf.get(..read), Some(b"ping".as_slice()));
}

#[test]
fn typed_create_deploy_io_close() {
    let connector = LoopbackFactory
        .create(LoopbackConfig { max_instances: 4 })
        .expect("create");
    let ctx = DeploymentContext::new();
    let plugin = connector.deploy(&ctx, "echo-module").expect("deploy");

    deploy_and_echo(plugin.as_ref());
    plugin.close().expect("close");
}

#[test]
fn erased_factory_matches_typed_behaviour() {
    let erased: Box<dyn AnyConnectorFactory> = Box::new(ErasedFactory::new(LoopbackFactory));
    assert_eq!(erased.id(), "loopback");
    assert_eq!(erased.deployment_type(), DeploymentType::TEST);

    let connector = erased
        .create(json!({ "max_instances": 4 }))
        .expect("erased create");
    let ctx = DeploymentContext::new();
    let plugin = connector.deploy(&ctx, "echo-module").expect("deploy");
    deploy_and_echo(plugin.as_ref());
    plugin.close().expect("close");
}

#[test]
fn erased_factory_rejects_malformed_configuration() {
    let erased = ErasedFactory::new(LoopbackFactory);
    let err = erased
        .create(json!({ "max_instances": "many" }))
        .expect_err("malformed config");
    assert!(matches!(err, DeployerError::Configuration { .. }));
}

#[test]
fn erased_factory_propagates_typed_rejection() {
    // The typed create's own validation surfaces identically through the
    // erased form.
    let erased = ErasedFactory::new(LoopbackFactory);
    let err = erased
        .create(json!({ "max_instances": 0 }))
        .expect_err("rejected config");
    assert!(matches!(err, DeployerError::Configuration { .. }));
}

#[test]
fn erased_schema_matches_typed_schema() {
    let typed = LoopbackFactory.configuration_schema();
    let erased = ErasedFactory::new(LoopbackFactory).configuration_schema();
    assert_eq!(
        serde_json::to_value(&typed).expect("typed schema"),
        serde_json::to_value(&erased).expect("erased schema"),
    );
}

#[test]
fn cancelled_context_blocks_deploy_through_the_whole_stack() {
    let erased = ErasedFactory::new(LoopbackFactory);
    let connector = erased
        .create(json!({ "max_instances": 1 }))
        .expect("create");

    let ctx = DeploymentContext::new();
    ctx.cancel();
    let err = connector
        .deploy(&ctx, "echo-module")
        .expect_err("cancelled deploy");
    assert!(matches!(err, DeployerError::ShuttingDown));
}
