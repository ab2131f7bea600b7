//! Tool: write_file — write content to a file, creating parent directories as needed.

use std::collections::BTreeMap;

use async_trait::async_trait;

use agentflow_core::{ParameterSpec, RequestContext};

use crate::tool::{Tool, ToolResult};

pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file. Creates parent directories if they do not exist. \
         Overwrites the file if it already exists."
    }

    fn parameters(&self) -> BTreeMap<String, ParameterSpec> {
        let mut params = BTreeMap::new();
        params.insert(
            "path".to_string(),
            ParameterSpec::string("Absolute or relative path to write to.").required(),
        );
        params.insert(
            "content".to_string(),
            ParameterSpec::string("Text content to write into the file.").required(),
        );
        params
    }

    async fn execute(&self, _ctx: &RequestContext, input: serde_json::Value) -> ToolResult {
        let path = match input.get("path").and_then(|v| v.as_str()) {
            Some(p) => p.to_string(),
            None => return ToolResult::error("missing required parameter: path"),
        };
        let content = match input.get("content").and_then(|v| v.as_str()) {
            Some(c) => c.to_string(),
            None => return ToolResult::error("missing required parameter: content"),
        };

        if let Some(parent) = std::path::Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    return ToolResult::error(format!(
                        "failed to create directories for '{}': {}",
                        path, e
                    ));
                }
            }
        }

        let byte_len = content.len();
        if let Err(e) = tokio::fs::write(&path, content).await {
            return ToolResult::error(format!("failed to write '{}': {}", path, e));
        }

        ToolResult::success(format!("File written: {} bytes to '{}'", byte_len, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_and_creates_parents() {
        let dir = std::env::temp_dir().join("agentflow-write-file-test").join("nested");
        let path = dir.join("out.txt");
        let _ = tokio::fs::remove_dir_all(dir.parent().unwrap()).await;

        let tool = WriteFileTool;
        let ctx = RequestContext::new("conv-1");
        let result = tool
            .execute(
                &ctx,
                serde_json::json!({"path": path.to_str().unwrap(), "content": "hello"}),
            )
            .await;
        assert!(!result.is_error);
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, "hello");
    }
}
