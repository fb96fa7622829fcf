use crate::store::InstanceStore;
use crate::types::{ProcessInstance, VariableValue};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory [`InstanceStore`]. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    instances: RwLock<HashMap<Uuid, (ProcessInstance, Vec<VariableValue>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InstanceStore for MemoryStore {
    async fn save_instance(
        &self,
        instance: &ProcessInstance,
        variables: &[VariableValue],
    ) -> Result<()> {
        self.instances
            .write()
            .await
            .insert(instance.id, (instance.clone(), variables.to_vec()));
        Ok(())
    }

    async fn load_instance(&self, id: Uuid) -> Result<Option<ProcessInstance>> {
        Ok(self
            .instances
            .read()
            .await
            .get(&id)
            .map(|(instance, _)| instance.clone()))
    }

    async fn load_variables(&self, id: Uuid) -> Result<Option<Vec<VariableValue>>> {
        Ok(self
            .instances
            .read()
            .await
            .get(&id)
            .map(|(_, variables)| variables.clone()))
    }

    async fn delete_instance(&self, id: Uuid) -> Result<Option<ProcessInstance>> {
        Ok(self
            .instances
            .write()
            .await
            .remove(&id)
            .map(|(instance, _)| instance))
    }

    async fn instance_count(&self) -> Result<usize> {
        Ok(self.instances.read().await.len())
    }
}
