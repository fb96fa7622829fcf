use crate::error::RequestError;
use crate::types::Value;
use indexmap::IndexMap;
use serde::Deserialize;

/// A request to start one process instance.
///
/// Variables keep the order in which they were supplied; that order is what
/// type-mismatch errors report. Re-supplying a name replaces the value in
/// its first position.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStartRequest {
    process_definition_key: String,
    #[serde(default)]
    business_key: Option<String>,
    #[serde(default)]
    variables: IndexMap<String, Value>,
}

impl ProcessStartRequest {
    pub fn builder() -> ProcessStartRequestBuilder {
        ProcessStartRequestBuilder::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, RequestError> {
        let request: ProcessStartRequest = serde_json::from_str(json)?;
        if request.process_definition_key.is_empty() {
            return Err(RequestError::MissingProcessDefinitionKey);
        }
        Ok(request)
    }

    pub fn process_definition_key(&self) -> &str {
        &self.process_definition_key
    }

    pub fn business_key(&self) -> Option<&str> {
        self.business_key.as_deref()
    }

    /// Supplied variables in supply order.
    pub fn variables(&self) -> &IndexMap<String, Value> {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

/// Fluent builder for [`ProcessStartRequest`].
#[derive(Clone, Debug, Default)]
pub struct ProcessStartRequestBuilder {
    process_definition_key: Option<String>,
    business_key: Option<String>,
    variables: IndexMap<String, Value>,
}

impl ProcessStartRequestBuilder {
    pub fn with_process_definition_key(mut self, key: impl Into<String>) -> Self {
        self.process_definition_key = Some(key.into());
        self
    }

    pub fn with_business_key(mut self, business_key: impl Into<String>) -> Self {
        self.business_key = Some(business_key.into());
        self
    }

    /// Supplying the same name twice replaces the value but keeps its position.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_variables<I, K, V>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.variables
            .extend(variables.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn build(self) -> Result<ProcessStartRequest, RequestError> {
        let process_definition_key = self
            .process_definition_key
            .filter(|k| !k.is_empty())
            .ok_or(RequestError::MissingProcessDefinitionKey)?;
        Ok(ProcessStartRequest {
            process_definition_key,
            business_key: self.business_key,
            variables: self.variables,
        })
    }
}
