use crate::types::{ProcessInstance, VariableValue};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Where started instances and their resolved variables go.
///
/// [`crate::runtime::ProcessRuntime`] only calls `save_instance` after the
/// variables have been resolved successfully.
#[async_trait]
pub trait InstanceStore: Send + Sync {
    async fn save_instance(
        &self,
        instance: &ProcessInstance,
        variables: &[VariableValue],
    ) -> Result<()>;
    async fn load_instance(&self, id: Uuid) -> Result<Option<ProcessInstance>>;
    async fn load_variables(&self, id: Uuid) -> Result<Option<Vec<VariableValue>>>;

    /// Remove an instance and its variables, returning what was removed.
    async fn delete_instance(&self, id: Uuid) -> Result<Option<ProcessInstance>>;

    async fn instance_count(&self) -> Result<usize>;
}
