use crate::error::ExtensionError;
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Format dates are serialized in (`yyyy-MM-dd`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Variable types ───────────────────────────────────────────

/// Declared type of a process variable, as named in extension documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    Boolean,
    Integer,
    String,
    Date,
    Json,
}

impl VariableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::Boolean => "boolean",
            VariableType::Integer => "integer",
            VariableType::String => "string",
            VariableType::Date => "date",
            VariableType::Json => "json",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Value ────────────────────────────────────────────────────

/// A raw variable value as supplied by a caller or taken from a default.
///
/// Deserializes through [`From<serde_json::Value>`]: a date arrives as
/// `Text` and is only turned into `Date` against a declared `date` type.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Text(String),
    /// Serialized as `yyyy-MM-dd`.
    Date(NaiveDate),
    /// Anything else: null, non-integral numbers, arrays, objects.
    Json(serde_json::Value),
}

impl Value {
    /// The type a value carries on its own, without a declaration.
    pub fn inferred_type(&self) -> VariableType {
        match self {
            Value::Bool(_) => VariableType::Boolean,
            Value::Integer(_) => VariableType::Integer,
            Value::Text(_) => VariableType::String,
            Value::Date(_) => VariableType::Date,
            Value::Json(_) => VariableType::Json,
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::from(i),
            Value::Text(s) => serde_json::Value::String(s),
            Value::Date(d) => serde_json::Value::String(d.format(DATE_FORMAT).to_string()),
            Value::Json(j) => j,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Json(serde_json::Value::Number(n)),
            },
            other => Value::Json(other),
        }
    }
}

/// A variable as it ends up on a process instance.
///
/// Deserializing re-reads `value` according to `type`, so a stored date
/// comes back as `Value::Date` and a `json` variable stays `Value::Json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredVariableValue")]
pub struct VariableValue {
    pub name: String,
    pub value: Value,
    /// Declared type for declared variables, inferred type otherwise.
    #[serde(rename = "type")]
    pub variable_type: VariableType,
}

#[derive(Deserialize)]
struct StoredVariableValue {
    name: String,
    value: serde_json::Value,
    #[serde(rename = "type")]
    variable_type: VariableType,
}

impl TryFrom<StoredVariableValue> for VariableValue {
    type Error = String;

    fn try_from(stored: StoredVariableValue) -> Result<Self, Self::Error> {
        let value = match (stored.variable_type, stored.value) {
            (VariableType::Date, serde_json::Value::String(text)) => {
                NaiveDate::parse_from_str(&text, DATE_FORMAT)
                    .map(Value::Date)
                    .map_err(|e| format!("variable '{}': bad date '{text}': {e}", stored.name))?
            }
            (VariableType::Json, raw) => Value::Json(raw),
            (_, raw) => Value::from(raw),
        };
        Ok(Self {
            name: stored.name,
            value,
            variable_type: stored.variable_type,
        })
    }
}

// ─── Definitions ──────────────────────────────────────────────

/// One variable declared in a process definition's extensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub variable_type: VariableType,
    #[serde(default)]
    pub required: bool,
    /// Default value, kept as written in the extension document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl VariableDefinition {
    pub fn new(name: impl Into<String>, variable_type: VariableType) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            variable_type,
            required: false,
            value: None,
        }
    }

    /// Builder: mark the variable as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Builder: set the default value.
    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// The declared variables of one process definition, keyed by name in
/// declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableContract {
    process_key: String,
    definitions: IndexMap<String, VariableDefinition>,
}

impl VariableContract {
    /// Build a contract. Variable names must be unique.
    pub fn new(
        process_key: impl Into<String>,
        definitions: Vec<VariableDefinition>,
    ) -> Result<Self, ExtensionError> {
        let process_key = process_key.into();
        let mut by_name = IndexMap::with_capacity(definitions.len());
        for def in definitions {
            if by_name.contains_key(&def.name) {
                return Err(ExtensionError::DuplicateVariable {
                    process_key,
                    name: def.name,
                });
            }
            by_name.insert(def.name.clone(), def);
        }
        Ok(Self {
            process_key,
            definitions: by_name,
        })
    }

    /// A contract that declares nothing; every variable passes through.
    pub fn empty(process_key: impl Into<String>) -> Self {
        Self {
            process_key: process_key.into(),
            definitions: IndexMap::new(),
        }
    }

    pub fn process_key(&self) -> &str {
        &self.process_key
    }

    /// Definitions in declaration order.
    pub fn definitions(&self) -> impl ExactSizeIterator<Item = &VariableDefinition> + '_ {
        self.definitions.values()
    }

    pub fn get(&self, name: &str) -> Option<&VariableDefinition> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

// ─── Process instance ─────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessInstanceStatus {
    Running,
    Deleted,
}

/// A started process instance. Execution itself happens elsewhere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessInstance {
    pub id: Uuid,
    pub process_definition_key: String,
    pub business_key: Option<String>,
    pub status: ProcessInstanceStatus,
    pub start_date: DateTime<Utc>,
}
