use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Why a start request was rejected. The message text is stable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Can't start process '{process_key}' without required variables {}", .names.join(", "))]
    MissingRequiredVariables {
        process_key: String,
        names: Vec<String>,
    },

    #[error("Can't start process '{process_key}' as variables have unexpected types {}", .names.join(", "))]
    InvalidVariableTypes {
        process_key: String,
        names: Vec<String>,
    },
}

impl ValidationError {
    pub fn process_key(&self) -> &str {
        match self {
            Self::MissingRequiredVariables { process_key, .. }
            | Self::InvalidVariableTypes { process_key, .. } => process_key,
        }
    }

    pub fn names(&self) -> &[String] {
        match self {
            Self::MissingRequiredVariables { names, .. }
            | Self::InvalidVariableTypes { names, .. } => names,
        }
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("start request has no process definition key")]
    MissingProcessDefinitionKey,

    #[error("invalid start request JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid extension JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid extension YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("process '{process_key}' declares variable '{name}' more than once")]
    DuplicateVariable { process_key: String, name: String },

    #[error("extensions for process '{0}' registered twice")]
    DuplicateProcess(String),
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("process instance not found: {0}")]
    InstanceNotFound(Uuid),

    #[error("instance store error: {0}")]
    Store(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message() {
        let err = ValidationError::MissingRequiredVariables {
            process_key: "initialVarsProcess".into(),
            names: vec!["age".into()],
        };
        assert_eq!(
            err.to_string(),
            "Can't start process 'initialVarsProcess' without required variables age"
        );
    }

    #[test]
    fn test_invalid_types_message_joins_names() {
        let err = ValidationError::InvalidVariableTypes {
            process_key: "p".into(),
            names: vec!["subscribe".into(), "name".into()],
        };
        assert_eq!(
            err.to_string(),
            "Can't start process 'p' as variables have unexpected types subscribe, name"
        );
        assert_eq!(err.process_key(), "p");
        assert_eq!(err.names().len(), 2);
    }

    #[test]
    fn test_runtime_error_is_transparent_for_validation() {
        let err: RuntimeError = ValidationError::MissingRequiredVariables {
            process_key: "p".into(),
            names: vec!["a".into(), "b".into()],
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Can't start process 'p' without required variables a, b"
        );
    }
}
