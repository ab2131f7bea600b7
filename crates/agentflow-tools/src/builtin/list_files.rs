//! Tool: list_files — list directory contents with type and size info.

use std::collections::BTreeMap;

use async_trait::async_trait;

use agentflow_core::{ParameterSpec, RequestContext};

use crate::tool::{Tool, ToolResult};

/// Maximum entries returned to avoid overwhelming the context window.
const MAX_ENTRIES: usize = 1_000;

pub struct ListFilesTool;

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List the contents of a directory. Each entry shows its type (file/dir) \
         and size in bytes. Returns at most 1000 entries."
    }

    fn parameters(&self) -> BTreeMap<String, ParameterSpec> {
        let mut params = BTreeMap::new();
        params.insert(
            "path".to_string(),
            ParameterSpec::string("Absolute or relative path to the directory.").required(),
        );
        params
    }

    async fn execute(&self, _ctx: &RequestContext, input: serde_json::Value) -> ToolResult {
        let path = match input.get("path").and_then(|v| v.as_str()) {
            Some(p) => p.to_string(),
            None => return ToolResult::error("missing required parameter: path"),
        };

        let mut read_dir = match tokio::fs::read_dir(&path).await {
            Ok(rd) => rd,
            Err(e) => return ToolResult::error(format!("failed to list '{}': {}", path, e)),
        };

        let mut entries: Vec<String> = Vec::new();
        let mut truncated = false;

        loop {
            if entries.len() >= MAX_ENTRIES {
                truncated = true;
                break;
            }
            let entry = match read_dir.next_entry().await {
                Ok(Some(e)) => e,
                Ok(None) => break,
                Err(_) => continue,
            };
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(_) => continue,
            };
            let name = entry.file_name().to_string_lossy().to_string();
            let kind = if metadata.is_dir() { "dir" } else { "file" };
            entries.push(format!("[{}] {} ({} bytes)", kind, name, metadata.len()));
        }

        entries.sort();
        let mut output = entries.join("\n");
        if truncated {
            output.push_str(&format!("\n\n[truncated at {} entries]", MAX_ENTRIES));
        }
        ToolResult::success(output)
    }
}
