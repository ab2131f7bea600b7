//! Wire-neutral tool schema — shared between the tool registry (which owns
//! `Tool` implementations) and provider adapters (which translate this into
//! each provider's JSON-schema dialect).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

/// Specification for a single named parameter of a `Tool`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Element spec, present when `param_type == Array`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParameterSpec>>,
}

impl ParameterSpec {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            param_type: ParameterType::String,
            description: description.into(),
            required: false,
            enum_values: None,
            default: None,
            items: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_enum(mut self, values: Vec<String>) -> Self {
        self.enum_values = Some(values);
        self
    }
}

/// Name + parameter map a caller-supplied `Tool` exposes to an `LlmProvider`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: std::collections::BTreeMap<String, ParameterSpec>,
}

impl ToolDefinition {
    /// Render this definition as a standard JSON-schema object, the form
    /// most chat-completions-style providers expect for `function.parameters`.
    /// Individual adapters may further wrap this (e.g. under `{"type":
    /// "function", "function": {...}}`) but the schema body itself is shared.
    pub fn to_json_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for (name, spec) in &self.parameters {
            properties.insert(name.clone(), parameter_to_json_schema(spec));
            if spec.required {
                required.push(serde_json::Value::String(name.clone()));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn parameter_to_json_schema(spec: &ParameterSpec) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    obj.insert(
        "type".to_string(),
        serde_json::Value::String(
            match spec.param_type {
                ParameterType::String => "string",
                ParameterType::Number => "number",
                ParameterType::Integer => "integer",
                ParameterType::Boolean => "boolean",
                ParameterType::Array => "array",
                ParameterType::Object => "object",
            }
            .to_string(),
        ),
    );
    obj.insert(
        "description".to_string(),
        serde_json::Value::String(spec.description.clone()),
    );
    if let Some(values) = &spec.enum_values {
        obj.insert(
            "enum".to_string(),
            serde_json::Value::Array(
                values.iter().cloned().map(serde_json::Value::String).collect(),
            ),
        );
    }
    if let Some(default) = &spec.default {
        obj.insert("default".to_string(), default.clone());
    }
    if let Some(items) = &spec.items {
        obj.insert("items".to_string(), parameter_to_json_schema(items));
    }
    serde_json::Value::Object(obj)
}
