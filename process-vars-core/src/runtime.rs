use crate::error::RuntimeError;
use crate::extensions::ExtensionRegistry;
use crate::request::ProcessStartRequest;
use crate::resolver::VariableContractResolver;
use crate::store::InstanceStore;
use crate::types::{ProcessInstance, ProcessInstanceStatus, VariableContract, VariableValue};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Starts, queries and deletes process instances.
///
/// Variables are resolved against the process definition's contract before
/// anything is written; a rejected start leaves no instance behind.
pub struct ProcessRuntime {
    registry: Arc<ExtensionRegistry>,
    resolver: VariableContractResolver,
    store: Arc<dyn InstanceStore>,
}

impl ProcessRuntime {
    pub fn new(registry: Arc<ExtensionRegistry>, store: Arc<dyn InstanceStore>) -> Self {
        Self {
            registry,
            resolver: VariableContractResolver::default(),
            store,
        }
    }

    /// Builder: replace the default resolver.
    pub fn with_resolver(mut self, resolver: VariableContractResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub async fn start(
        &self,
        request: ProcessStartRequest,
    ) -> Result<ProcessInstance, RuntimeError> {
        let key = request.process_definition_key();
        let empty;
        let contract = match self.registry.contract(key) {
            Some(contract) => contract,
            None => {
                tracing::debug!(process_key = key, "no variable extensions registered");
                empty = VariableContract::empty(key);
                &empty
            }
        };

        let variables = match self.resolver.resolve(contract, request.variables()) {
            Ok(variables) => variables,
            Err(err) => {
                tracing::warn!(process_key = key, error = %err, "process start rejected");
                return Err(err.into());
            }
        };

        let instance = ProcessInstance {
            id: Uuid::now_v7(),
            process_definition_key: key.to_string(),
            business_key: request.business_key().map(str::to_string),
            status: ProcessInstanceStatus::Running,
            start_date: Utc::now(),
        };
        self.store.save_instance(&instance, &variables).await?;

        tracing::info!(
            instance_id = %instance.id,
            process_key = key,
            variables = variables.len(),
            "process instance started"
        );
        Ok(instance)
    }

    pub async fn process_instance(&self, id: Uuid) -> Result<ProcessInstance, RuntimeError> {
        self.store
            .load_instance(id)
            .await?
            .ok_or(RuntimeError::InstanceNotFound(id))
    }

    pub async fn variables(&self, id: Uuid) -> Result<Vec<VariableValue>, RuntimeError> {
        self.store
            .load_variables(id)
            .await?
            .ok_or(RuntimeError::InstanceNotFound(id))
    }

    /// Remove an instance and its variables. Returns the instance marked `Deleted`.
    pub async fn delete(&self, id: Uuid) -> Result<ProcessInstance, RuntimeError> {
        let mut instance = self
            .store
            .delete_instance(id)
            .await?
            .ok_or(RuntimeError::InstanceNotFound(id))?;
        instance.status = ProcessInstanceStatus::Deleted;
        tracing::info!(instance_id = %id, "process instance deleted");
        Ok(instance)
    }
}
