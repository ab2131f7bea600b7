//! The caller-supplied tool system: a `Tool` trait plus the registry
//! conversions the orchestrator needs to describe tools to a provider.

use std::collections::BTreeMap;

use async_trait::async_trait;

use agentflow_core::{ParameterSpec, RequestContext, ToolDefinition};

/// Result of executing a tool.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Text content returned to the LLM.
    pub content: String,
    /// Whether the tool execution failed.
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
        }
    }
}

/// Trait every caller-supplied tool implements.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name for this tool (e.g. "read_file").
    fn name(&self) -> &str;
    /// Human-readable description of what this tool does.
    fn description(&self) -> &str;
    /// Parameter schema, keyed by parameter name.
    fn parameters(&self) -> BTreeMap<String, ParameterSpec>;
    /// Execute the tool with the given JSON arguments. `ctx` carries the
    /// tenant/conversation/cancellation handle the orchestrator threads
    /// through every operation.
    async fn execute(&self, ctx: &RequestContext, arguments: serde_json::Value) -> ToolResult;
}

/// Convert a slice of tools to the wire-neutral definitions a provider
/// adapter serializes into its own JSON-schema dialect.
pub fn to_definitions(tools: &[Box<dyn Tool>]) -> Vec<ToolDefinition> {
    tools
        .iter()
        .map(|t| ToolDefinition {
            name: t.name().to_string(),
            description: t.description().to_string(),
            parameters: t.parameters(),
        })
        .collect()
}

/// Look up a tool by name among a caller-supplied list.
pub fn find<'a>(tools: &'a [Box<dyn Tool>], name: &str) -> Option<&'a dyn Tool> {
    tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
}
