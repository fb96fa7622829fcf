use crate::error::ExtensionError;
use crate::types::{VariableContract, VariableDefinition};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// File-name suffixes picked up by [`ExtensionRegistry::load_dir`].
pub const EXTENSION_SUFFIXES: [&str; 3] = [
    "-extensions.json",
    "-extensions.yaml",
    "-extensions.yml",
];

/// One extension document: the variable declarations of a process definition.
///
/// ```json
/// {
///   "id": "initialVarsProcess",
///   "extensions": {
///     "properties": {
///       "1": {"id": "1", "name": "age", "type": "integer", "required": true}
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessExtensions {
    pub id: String,
    #[serde(default)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Extensions {
    /// Keyed by property id, in document order.
    #[serde(default)]
    pub properties: IndexMap<String, VariableDefinition>,
}

impl ProcessExtensions {
    pub fn from_json_str(json: &str) -> Result<Self, ExtensionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ExtensionError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Convert to a contract. A property without an inner `id` takes its map key.
    pub fn into_contract(self) -> Result<VariableContract, ExtensionError> {
        let definitions = self
            .extensions
            .properties
            .into_iter()
            .map(|(key, mut def)| {
                if def.id.is_empty() {
                    def.id = key;
                }
                def
            })
            .collect();
        VariableContract::new(self.id, definitions)
    }
}

/// Variable contracts of all known process definitions, by process key.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    contracts: HashMap<String, VariableContract>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contract. A key may be registered once.
    pub fn register(&mut self, contract: VariableContract) -> Result<(), ExtensionError> {
        let key = contract.process_key().to_string();
        if self.contracts.contains_key(&key) {
            return Err(ExtensionError::DuplicateProcess(key));
        }
        self.contracts.insert(key, contract);
        Ok(())
    }

    pub fn contract(&self, process_key: &str) -> Option<&VariableContract> {
        self.contracts.get(process_key)
    }

    pub fn contains(&self, process_key: &str) -> bool {
        self.contracts.contains_key(process_key)
    }

    /// Registered process keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.contracts.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Load every `*-extensions.{json,yaml,yml}` file directly under `dir`,
    /// in file-name order.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ExtensionError> {
        let dir = dir.as_ref();
        let io_err = |source| ExtensionError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let is_extension = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| EXTENSION_SUFFIXES.iter().any(|s| n.ends_with(s)));
            if is_extension && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registry = Self::new();
        for path in paths {
            let text = std::fs::read_to_string(&path).map_err(|source| ExtensionError::Io {
                path: path.clone(),
                source,
            })?;
            let doc = if path.extension().is_some_and(|e| e == "json") {
                ProcessExtensions::from_json_str(&text)?
            } else {
                ProcessExtensions::from_yaml_str(&text)?
            };
            let contract = doc.into_contract()?;
            tracing::debug!(
                path = %path.display(),
                process_key = contract.process_key(),
                variables = contract.len(),
                "loaded process extensions"
            );
            registry.register(contract)?;
        }
        Ok(registry)
    }
}
