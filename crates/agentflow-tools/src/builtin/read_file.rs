//! Tool: read_file — read the contents of a file from disk.

use std::collections::BTreeMap;

use async_trait::async_trait;

use agentflow_core::{ParameterSpec, RequestContext};

use crate::tool::{Tool, ToolResult};

/// Maximum characters returned by read_file to avoid flooding the context window.
const MAX_OUTPUT_CHARS: usize = 30_000;

pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a file. Optionally limit to a line range with \
         `offset` (1-based first line) and `limit` (number of lines to return)."
    }

    fn parameters(&self) -> BTreeMap<String, ParameterSpec> {
        let mut params = BTreeMap::new();
        params.insert(
            "path".to_string(),
            ParameterSpec::string("Absolute or relative path to the file.").required(),
        );
        params.insert(
            "offset".to_string(),
            ParameterSpec {
                param_type: agentflow_core::ParameterType::Integer,
                description: "1-based line number to start reading from (optional).".to_string(),
                required: false,
                enum_values: None,
                default: None,
                items: None,
            },
        );
        params.insert(
            "limit".to_string(),
            ParameterSpec {
                param_type: agentflow_core::ParameterType::Integer,
                description: "Maximum number of lines to return (optional).".to_string(),
                required: false,
                enum_values: None,
                default: None,
                items: None,
            },
        );
        params
    }

    async fn execute(&self, _ctx: &RequestContext, input: serde_json::Value) -> ToolResult {
        let path = match input.get("path").and_then(|v| v.as_str()) {
            Some(p) => p.to_string(),
            None => return ToolResult::error("missing required parameter: path"),
        };

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) => return ToolResult::error(format!("failed to read '{}': {}", path, e)),
        };

        let offset = input
            .get("offset")
            .and_then(|v| v.as_u64())
            .map(|v| v.saturating_sub(1) as usize);
        let limit = input.get("limit").and_then(|v| v.as_u64()).map(|v| v as usize);

        let result = if offset.is_some() || limit.is_some() {
            let start = offset.unwrap_or(0);
            let lines: Vec<&str> = content.lines().skip(start).collect();
            let lines = if let Some(n) = limit { &lines[..n.min(lines.len())] } else { &lines[..] };
            lines.join("\n")
        } else {
            content
        };

        let result = if result.len() > MAX_OUTPUT_CHARS {
            format!(
                "{}\n\n[output truncated at {} characters]",
                &result[..MAX_OUTPUT_CHARS],
                MAX_OUTPUT_CHARS,
            )
        } else {
            result
        };

        ToolResult::success(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_full_file() {
        let dir = std::env::temp_dir().join("agentflow-read-file-test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("a.txt");
        tokio::fs::write(&path, "line1\nline2\nline3").await.unwrap();

        let tool = ReadFileTool;
        let ctx = RequestContext::new("conv-1");
        let result = tool
            .execute(&ctx, serde_json::json!({"path": path.to_str().unwrap()}))
            .await;
        assert!(!result.is_error);
        assert_eq!(result.content, "line1\nline2\nline3");
    }

    #[tokio::test]
    async fn missing_path_is_error() {
        let tool = ReadFileTool;
        let ctx = RequestContext::new("conv-1");
        let result = tool.execute(&ctx, serde_json::json!({})).await;
        assert!(result.is_error);
    }
}
