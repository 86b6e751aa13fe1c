//! Unit tests for the deployer registry.

use mockall::mock;
use rstest::{fixture, rstest};
use schemars::schema::RootSchema;
use serde_json::json;

use gantry_deployer::stub::{LoopbackConnector, StubFactory};
use gantry_deployer::{DeployerError, DeploymentContext, ErasedFactory};

use super::*;

fn stub(id: &'static str) -> Box<dyn AnyConnectorFactory> {
    Box::new(ErasedFactory::new(StubFactory::with_id(id)))
}

#[fixture]
fn populated_registry() -> DeployerRegistry {
    DeployerRegistry::with_factories([stub("docker"), stub("python")])
        .expect("distinct IDs register cleanly")
}

// ---------------------------------------------------------------------------
// Construction and registration
// ---------------------------------------------------------------------------

#[test]
fn new_registry_is_empty() {
    let registry = DeployerRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
}

#[rstest]
fn register_and_get(populated_registry: DeployerRegistry) {
    assert_eq!(populated_registry.len(), 2);
    let factory = populated_registry.get("docker").expect("get docker");
    assert_eq!(factory.id(), "docker");
}

#[test]
fn register_rejects_duplicate_id() {
    let mut registry = DeployerRegistry::new();
    registry.register(stub("docker")).expect("first register");
    let err = registry
        .register(stub("docker"))
        .expect_err("duplicate must fail");
    assert!(matches!(err, RegistryError::DuplicateDeployer { .. }));
    assert!(err.to_string().contains("docker"));
}

#[test]
fn with_factories_rejects_duplicates() {
    let err = DeployerRegistry::with_factories([stub("test"), stub("test")])
        .expect_err("duplicate must fail");
    assert!(matches!(err, RegistryError::DuplicateDeployer { .. }));
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[rstest]
fn get_returns_none_for_missing(populated_registry: DeployerRegistry) {
    assert!(populated_registry.get("kubernetes").is_none());
}

#[rstest]
fn factories_are_independently_retrievable(populated_registry: DeployerRegistry) {
    let docker = populated_registry.get("docker").expect("docker");
    let python = populated_registry.get("python").expect("python");
    assert_ne!(docker.id(), python.id());

    // No cross-talk: each ID resolves to its own factory and connector.
    let docker_connector = docker.create(json!({})).expect("docker create");
    let err = docker_connector
        .deploy(&DeploymentContext::new(), "unused-source")
        .expect_err("stub connector");
    assert!(err.to_string().contains("docker"));
}

#[rstest]
fn ids_are_sorted(populated_registry: DeployerRegistry) {
    assert_eq!(populated_registry.ids(), vec!["docker", "python"]);
}

#[rstest]
fn find_by_deployment_type_matches_all_stubs(populated_registry: DeployerRegistry) {
    let found = populated_registry.find_by_deployment_type(&DeploymentType::TEST);
    assert_eq!(found.len(), 2);
    let none = populated_registry.find_by_deployment_type(&DeploymentType::IMAGE);
    assert!(none.is_empty());
}

#[rstest]
fn configuration_schemas_cover_every_deployer(populated_registry: DeployerRegistry) {
    let schemas = populated_registry.configuration_schemas();
    let ids: Vec<&str> = schemas.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["docker", "python"]);
}

// ---------------------------------------------------------------------------
// Connector construction
// ---------------------------------------------------------------------------

#[rstest]
fn create_connector_for_unknown_id_fails(populated_registry: DeployerRegistry) {
    let err = populated_registry
        .create_connector("kubernetes", json!({}))
        .expect_err("unknown deployer");
    assert!(matches!(err, RegistryError::UnknownDeployer { .. }));
}

#[rstest]
fn create_connector_delegates_to_factory(populated_registry: DeployerRegistry) {
    let connector = populated_registry
        .create_connector("python", json!({}))
        .expect("create succeeds");
    let err = connector
        .deploy(&DeploymentContext::new(), "unused-source")
        .expect_err("stub deploy fails");
    assert!(matches!(err, DeployerError::Unimplemented { .. }));
}

#[rstest]
fn create_connector_passes_factory_errors_through(populated_registry: DeployerRegistry) {
    let err = populated_registry
        .create_connector("docker", json!(["not", "a", "config"]))
        .expect_err("malformed config");
    assert!(matches!(
        err,
        RegistryError::Deployer(DeployerError::Configuration { .. })
    ));
}

// ---------------------------------------------------------------------------
// Factory interaction (mocked)
// ---------------------------------------------------------------------------

mock! {
    Factory {}

    impl AnyConnectorFactory for Factory {
        fn id(&self) -> &str;
        fn deployment_type(&self) -> DeploymentType;
        fn configuration_schema(&self) -> RootSchema;
        fn create(
            &self,
            config: serde_json::Value,
        ) -> Result<Box<dyn Connector>, DeployerError>;
    }
}

#[test]
fn create_connector_forwards_the_configuration_value() {
    let mut factory = MockFactory::new();
    factory.expect_id().return_const(String::from("mocked"));
    factory
        .expect_deployment_type()
        .return_const(DeploymentType::TEST);
    factory
        .expect_create()
        .withf(|config| config == &json!({ "token": "s3cr3t" }))
        .times(1)
        .returning(|_| Ok(Box::new(LoopbackConnector::new())));

    let mut registry = DeployerRegistry::new();
    registry.register(Box::new(factory)).expect("register mock");
    registry
        .create_connector("mocked", json!({ "token": "s3cr3t" }))
        .expect("create succeeds");
}
