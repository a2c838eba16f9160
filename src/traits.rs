//! Operation trait and registry.
//!
//! Every externally callable function is an [`Operation`]: a named,
//! described handler with a JSON Schema for its parameters. Orchestrators
//! discover operations through [`OperationRegistry::list`] and call them
//! through [`OperationRegistry::invoke`] instead of reflecting over types.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              OperationRegistry               │
//! │  ┌───────────┐ ┌────────────┐ ┌────────────┐ │
//! │  │ TextFile  │ │ PdfReader  │ │  Sqlite    │ │
//! │  │ ReadAll   │ │ ReadDoc…   │ │ ReadScores │ │
//! │  └───────────┘ └────────────┘ └────────────┘ │
//! └──────────────┬───────────────────────────────┘
//!                ▼
//!      CLI (`ctxs call`) / HTTP (`POST /operations/{name}`)
//! ```
//!
//! # Usage
//!
//! ```rust
//! use context_sources::traits::OperationRegistry;
//!
//! let operations = OperationRegistry::new();
//! // operations.register(Arc::new(MyOperation::new()));
//! assert!(operations.is_empty());
//! ```

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;
use crate::connector_pdf::DocumentConnector;
use crate::connector_sqlite::RelationalConnector;
use crate::connector_text::TextConnector;
use crate::error::SourceError;
use crate::operations;

/// A named, self-describing read operation over one data source.
///
/// `invoke` cannot fail: source faults are reported inside the returned
/// string. Only dispatch problems (unknown name, bad parameters) are
/// errors, and those are handled by the registry before `invoke` runs.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Plugin namespace, e.g. `"Sqlite"`.
    fn plugin(&self) -> &str;

    /// Operation name within the plugin, e.g. `"ReadScores"`.
    fn name(&self) -> &str;

    /// One-line description used for function selection.
    fn description(&self) -> &str;

    /// JSON Schema (`type: "object"`) for the parameters.
    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    /// `"{plugin}.{name}"`, unique within a registry.
    fn qualified_name(&self) -> String {
        format!("{}.{}", self.plugin(), self.name())
    }

    /// Run the operation with parameters already validated against
    /// [`parameters_schema`](Operation::parameters_schema).
    async fn invoke(&self, params: Value) -> String;
}

/// Serializable operation descriptor for listings.
#[derive(Debug, Clone, Serialize)]
pub struct OperationInfo {
    /// Qualified name (`Plugin.Operation`).
    pub name: String,
    pub plugin: String,
    pub description: String,
    /// JSON Schema of the parameters.
    pub parameters: Value,
}

/// Errors raised before an operation runs.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no operation registered with name: {0}")]
    UnknownOperation(String),

    #[error("operation name '{name}' is ambiguous, use one of: {candidates}")]
    Ambiguous { name: String, candidates: String },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

/// Registry of callable operations, in registration order.
pub struct OperationRegistry {
    operations: Vec<Arc<dyn Operation>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Registry with the built-in operations of every configured source.
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let mut registry = Self::new();
        let sources = &config.sources;

        if let Some(path) = &sources.text_file {
            operations::register_text(&mut registry, Arc::new(TextConnector::new(path)));
        }
        if let Some(path) = &sources.pdf_file {
            operations::register_pdf(&mut registry, Arc::new(DocumentConnector::new(path)?));
        }
        if let Some(path) = &sources.database {
            operations::register_sqlite(&mut registry, Arc::new(RelationalConnector::new(path)));
        }

        Ok(registry)
    }

    /// Register an operation. A later registration with the same qualified
    /// name replaces the earlier one.
    pub fn register(&mut self, operation: Arc<dyn Operation>) {
        let name = operation.qualified_name();
        self.operations.retain(|o| o.qualified_name() != name);
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[Arc<dyn Operation>] {
        &self.operations
    }

    /// Look up by qualified name, or by bare name when exactly one plugin
    /// provides it.
    pub fn find(&self, name: &str) -> Result<&Arc<dyn Operation>, DispatchError> {
        if let Some(op) = self.operations.iter().find(|o| o.qualified_name() == name) {
            return Ok(op);
        }

        let matches: Vec<&Arc<dyn Operation>> =
            self.operations.iter().filter(|o| o.name() == name).collect();
        match matches.as_slice() {
            [] => Err(DispatchError::UnknownOperation(name.to_string())),
            [op] => Ok(*op),
            many => Err(DispatchError::Ambiguous {
                name: name.to_string(),
                candidates: many
                    .iter()
                    .map(|o| o.qualified_name())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    pub fn list(&self) -> Vec<OperationInfo> {
        self.operations
            .iter()
            .map(|o| OperationInfo {
                name: o.qualified_name(),
                plugin: o.plugin().to_string(),
                description: o.description().to_string(),
                parameters: o.parameters_schema(),
            })
            .collect()
    }

    /// Validate `params` and run the named operation.
    pub async fn invoke(&self, name: &str, params: Value) -> Result<String, DispatchError> {
        let op = self.find(name)?;
        let params = validate_params(&op.parameters_schema(), &params)?;
        Ok(op.invoke(params).await)
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check `params` against an operation's schema: every `required` key is
/// present and every declared `"type": "string"` property holds a string.
///
/// Operation parameters are all strings, so no other JSON Schema types are
/// checked. `null` params are treated as `{}`.
pub fn validate_params(schema: &Value, params: &Value) -> Result<Value, DispatchError> {
    let params_obj = match params {
        Value::Object(map) => map.clone(),
        Value::Null => serde_json::Map::new(),
        other => {
            return Err(DispatchError::InvalidParams(format!(
                "parameters must be an object, got {}",
                json_type_name(other)
            )))
        }
    };

    let required = schema
        .get("required")
        .and_then(|r| r.as_array())
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str());
    for req_field in required {
        if !params_obj.contains_key(req_field) {
            return Err(DispatchError::InvalidParams(format!(
                "missing required parameter: {}",
                req_field
            )));
        }
    }

    let properties = schema.get("properties").and_then(|p| p.as_object());
    for (prop_name, prop_schema) in properties.into_iter().flatten() {
        let declared_string = prop_schema.get("type").and_then(|t| t.as_str()) == Some("string");
        if let Some(value) = params_obj.get(prop_name) {
            if declared_string && !value.is_string() {
                return Err(DispatchError::InvalidParams(format!(
                    "parameter '{}' must be of type 'string', got {}",
                    prop_name,
                    json_type_name(value)
                )));
            }
        }
    }

    Ok(Value::Object(params_obj))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
