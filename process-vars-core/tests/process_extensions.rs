//! Start/query/delete scenarios against the `initialVarsProcess` fixture.

use chrono::NaiveDate;
use process_vars_core::{
    ExtensionRegistry, InstanceStore, MemoryStore, ProcessInstanceStatus, ProcessRuntime,
    ProcessStartRequest, RuntimeError, ValidationError, VariableType,
};
use std::path::PathBuf;
use std::sync::Arc;

const INITIAL_VARS_PROCESS: &str = "initialVarsProcess";

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn runtime() -> (ProcessRuntime, Arc<MemoryStore>) {
    let registry = ExtensionRegistry::load_dir(fixtures_dir()).unwrap();
    let store = Arc::new(MemoryStore::new());
    (ProcessRuntime::new(Arc::new(registry), store.clone()), store)
}

#[tokio::test]
async fn process_instance_has_initial_variables() {
    let (runtime, _) = runtime();

    let instance = runtime
        .start(
            ProcessStartRequest::builder()
                .with_process_definition_key(INITIAL_VARS_PROCESS)
                .with_variable("extraVar", true)
                .with_variable("age", 10)
                .with_business_key("my business key")
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(instance.status, ProcessInstanceStatus::Running);
    assert_eq!(instance.business_key.as_deref(), Some("my business key"));

    let variables = runtime.variables(instance.id).await.unwrap();
    assert_eq!(variables.len(), 4);
    let names: Vec<&str> = variables.iter().map(|v| v.name.as_str()).collect();
    for expected in ["extraVar", "name", "age", "birth"] {
        assert!(names.contains(&expected), "missing {expected} in {names:?}");
    }
    assert!(!names.contains(&"subscribe"));

    let deleted = runtime.delete(instance.id).await.unwrap();
    assert_eq!(deleted.status, ProcessInstanceStatus::Deleted);
}

#[tokio::test]
async fn process_instance_has_valid_initial_variables() {
    let (runtime, _) = runtime();

    let instance = runtime
        .start(
            ProcessStartRequest::builder()
                .with_process_definition_key(INITIAL_VARS_PROCESS)
                .with_variable("extraVar", true)
                .with_variable("age", 10)
                .with_variable("name", "bob")
                .with_variable("subscribe", true)
                .with_variable("birth", NaiveDate::from_ymd_opt(2009, 11, 30).unwrap())
                .with_business_key("my business key")
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

    let variables = runtime.variables(instance.id).await.unwrap();
    assert_eq!(variables.len(), 5);
    let typed: Vec<(&str, VariableType)> = variables
        .iter()
        .map(|v| (v.name.as_str(), v.variable_type))
        .collect();
    for expected in [
        ("extraVar", VariableType::Boolean),
        ("name", VariableType::String),
        ("age", VariableType::Integer),
        ("birth", VariableType::Date),
        ("subscribe", VariableType::Boolean),
    ] {
        assert!(typed.contains(&expected), "missing {expected:?} in {typed:?}");
    }

    runtime.delete(instance.id).await.unwrap();
}

#[tokio::test]
async fn process_instance_fails_without_required_variables() {
    let (runtime, store) = runtime();

    let err = runtime
        .start(
            ProcessStartRequest::builder()
                .with_process_definition_key(INITIAL_VARS_PROCESS)
                .with_variable("extraVar", true)
                .build()
                .unwrap(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("Can't start process '{INITIAL_VARS_PROCESS}' without required variables age")
    );
    assert_eq!(store.instance_count().await.unwrap(), 0);
}

#[tokio::test]
async fn process_instance_fails_if_variable_type_incorrect() {
    let (runtime, store) = runtime();

    let err = runtime
        .start(
            ProcessStartRequest::builder()
                .with_process_definition_key(INITIAL_VARS_PROCESS)
                .with_variable("subscribe", "ok")
                .with_variable("name", 7)
                .with_variable("birth", "thisisnotadate")
                .with_variable("age", true)
                .build()
                .unwrap(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!(
            "Can't start process '{INITIAL_VARS_PROCESS}' as variables have unexpected types subscribe, name, birth, age"
        )
    );
    assert!(matches!(
        err,
        RuntimeError::Validation(ValidationError::InvalidVariableTypes { .. })
    ));
    assert_eq!(store.instance_count().await.unwrap(), 0);
}

// Names are listed in supply order, not the hash order of the reference message.
#[tokio::test]
async fn invalid_types_use_supply_order_not_hash_order() {
    let (runtime, _) = runtime();

    let err = runtime
        .start(
            ProcessStartRequest::builder()
                .with_process_definition_key(INITIAL_VARS_PROCESS)
                .with_variable("age", true)
                .with_variable("name", 7)
                .with_variable("subscribe", "ok")
                .with_variable("birth", "thisisnotadate")
                .build()
                .unwrap(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!(
            "Can't start process '{INITIAL_VARS_PROCESS}' as variables have unexpected types age, name, subscribe, birth"
        )
    );
}

#[tokio::test]
async fn deleted_instance_is_gone() {
    let (runtime, _) = runtime();
    let instance = runtime
        .start(
            ProcessStartRequest::builder()
                .with_process_definition_key(INITIAL_VARS_PROCESS)
                .with_variable("age", 1)
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        runtime.process_instance(instance.id).await.unwrap().id,
        instance.id
    );
    runtime.delete(instance.id).await.unwrap();
    assert!(matches!(
        runtime.variables(instance.id).await,
        Err(RuntimeError::InstanceNotFound(_))
    ));
}
