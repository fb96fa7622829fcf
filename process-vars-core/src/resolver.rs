use crate::error::ValidationError;
use crate::types::{
    Value, VariableContract, VariableDefinition, VariableType, VariableValue, DATE_FORMAT,
};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Deserialize;

/// `yyyy-MM-dd`.
pub const DEFAULT_DATE_FORMAT: &str = DATE_FORMAT;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// chrono format used to accept text values for `date` variables.
    pub date_format: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Checks and merges a start request's variables against a [`VariableContract`].
///
/// Resolution is pure. The caller persists the result, and only on `Ok`.
#[derive(Clone, Debug, Default)]
pub struct VariableContractResolver {
    config: ResolverConfig,
}

/// A candidate entry in the resolved set, before type checking.
struct Candidate<'a> {
    name: &'a str,
    value: Value,
    definition: Option<&'a VariableDefinition>,
}

impl VariableContractResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `supplied` against `contract`.
    ///
    /// Output order: supplied variables in supply order, then injected
    /// defaults in declaration order. A type mismatch is reported before
    /// missing required variables.
    pub fn resolve(
        &self,
        contract: &VariableContract,
        supplied: &IndexMap<String, Value>,
    ) -> Result<Vec<VariableValue>, ValidationError> {
        let mut candidates: Vec<Candidate<'_>> = supplied
            .iter()
            .map(|(name, value)| Candidate {
                name,
                value: value.clone(),
                definition: contract.get(name),
            })
            .collect();

        for def in contract.definitions() {
            if let Some(default) = &def.value {
                if !supplied.contains_key(&def.name) {
                    candidates.push(Candidate {
                        name: &def.name,
                        value: Value::from(default.clone()),
                        definition: Some(def),
                    });
                }
            }
        }

        let mut resolved = Vec::with_capacity(candidates.len());
        let mut mismatched = Vec::new();
        for candidate in candidates {
            match candidate.definition {
                Some(def) => match self.coerce(def.variable_type, candidate.value) {
                    Some(value) => resolved.push(VariableValue {
                        name: candidate.name.to_string(),
                        value,
                        variable_type: def.variable_type,
                    }),
                    None => mismatched.push(candidate.name.to_string()),
                },
                None => {
                    let variable_type = candidate.value.inferred_type();
                    resolved.push(VariableValue {
                        name: candidate.name.to_string(),
                        value: candidate.value,
                        variable_type,
                    });
                }
            }
        }

        if !mismatched.is_empty() {
            tracing::debug!(
                process_key = contract.process_key(),
                names = ?mismatched,
                "variables have unexpected types"
            );
            return Err(ValidationError::InvalidVariableTypes {
                process_key: contract.process_key().to_string(),
                names: mismatched,
            });
        }

        let missing: Vec<String> = contract
            .definitions()
            .filter(|def| def.required && !resolved.iter().any(|v| v.name == def.name))
            .map(|def| def.name.clone())
            .collect();
        if !missing.is_empty() {
            tracing::debug!(
                process_key = contract.process_key(),
                names = ?missing,
                "required variables missing"
            );
            return Err(ValidationError::MissingRequiredVariables {
                process_key: contract.process_key().to_string(),
                names: missing,
            });
        }

        Ok(resolved)
    }

    /// Does `value` satisfy `declared`? Date text is parsed with the
    /// configured format; `json` takes any value.
    pub fn matches(&self, declared: VariableType, value: &Value) -> bool {
        match (declared, value) {
            (VariableType::Json, _)
            | (VariableType::Boolean, Value::Bool(_))
            | (VariableType::Integer, Value::Integer(_))
            | (VariableType::String, Value::Text(_))
            | (VariableType::Date, Value::Date(_)) => true,
            (VariableType::Date, Value::Text(text)) => self.parse_date(text).is_some(),
            _ => false,
        }
    }

    /// Type-check and normalize. `None` means the value does not match.
    fn coerce(&self, declared: VariableType, value: Value) -> Option<Value> {
        match (declared, value) {
            (VariableType::Date, Value::Text(text)) => self.parse_date(&text).map(Value::Date),
            (VariableType::Json, value) => Some(Value::Json(value.into())),
            (declared, value) if self.matches(declared, &value) => Some(value),
            _ => None,
        }
    }

    fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(text, &self.config.date_format).ok()
    }
}
