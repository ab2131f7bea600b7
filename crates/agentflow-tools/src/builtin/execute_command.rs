//! Tool: execute_command — one-shot shell command execution.
//!
//! A minimal, self-contained stand-in for the reference lineage's
//! `TerminalManager`-backed version: a fixed denylist and a hard timeout,
//! no persistent session or interactive shell.

use std::collections::BTreeMap;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use agentflow_core::{ParameterSpec, RequestContext};

use crate::tool::{Tool, ToolResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DENYLIST: &[&str] = &["rm -rf /", "mkfs", ":(){ :|:& };:", "sudo "];

pub struct ExecuteCommandTool;

#[async_trait]
impl Tool for ExecuteCommandTool {
    fn name(&self) -> &str {
        "execute_command"
    }

    fn description(&self) -> &str {
        "Execute a shell command and return its stdout and stderr. \
         Obviously destructive commands are blocked. Default timeout is 30 seconds."
    }

    fn parameters(&self) -> BTreeMap<String, ParameterSpec> {
        let mut params = BTreeMap::new();
        params.insert(
            "command".to_string(),
            ParameterSpec::string("The shell command to execute via sh -c.").required(),
        );
        params
    }

    async fn execute(&self, ctx: &RequestContext, input: serde_json::Value) -> ToolResult {
        let command = match input.get("command").and_then(|v| v.as_str()) {
            Some(c) => c,
            None => return ToolResult::error("missing required parameter: command"),
        };

        if let Some(blocked) = DENYLIST.iter().find(|pattern| command.contains(**pattern)) {
            return ToolResult::error(format!("command blocked by safety check: {blocked}"));
        }

        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match child {
            Ok(c) => c,
            Err(e) => return ToolResult::error(format!("failed to spawn command: {e}")),
        };
        let mut child_stdout = child.stdout.take();
        let mut child_stderr = child.stderr.take();

        // Read both pipes concurrently with the wait, mirroring
        // `wait_with_output`'s approach, so a chatty command can't deadlock
        // against a full pipe buffer while we wait for exit.
        let drain = async {
            let wait = child.wait();
            let stdout = async {
                let mut buf = String::new();
                if let Some(out) = child_stdout.as_mut() {
                    let _ = out.read_to_string(&mut buf).await;
                }
                buf
            };
            let stderr = async {
                let mut buf = String::new();
                if let Some(err) = child_stderr.as_mut() {
                    let _ = err.read_to_string(&mut buf).await;
                }
                buf
            };
            tokio::join!(wait, stdout, stderr)
        };

        let cancellation = ctx.cancellation.clone();
        let (status, stdout, stderr) = tokio::select! {
            result = tokio::time::timeout(DEFAULT_TIMEOUT, drain) => match result {
                Ok((Ok(status), stdout, stderr)) => (status, stdout, stderr),
                Ok((Err(e), _, _)) => return ToolResult::error(format!("command execution failed: {e}")),
                Err(_) => {
                    let _ = child.start_kill();
                    return ToolResult::error("command timed out after 30 seconds");
                }
            },
            _ = cancellation.cancelled() => {
                let _ = child.start_kill();
                return ToolResult::error("command cancelled");
            }
        };

        let mut text = String::new();
        if !stdout.is_empty() {
            text.push_str(&stdout);
        }
        if !stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str("[stderr]\n");
            text.push_str(&stderr);
        }
        if let Some(code) = status.code() {
            if code != 0 {
                text.push_str(&format!("\n[exit code: {code}]"));
            }
        }
        if text.is_empty() {
            text = "(no output)".to_string();
        }

        ToolResult::success(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_simple_command() {
        let tool = ExecuteCommandTool;
        let ctx = RequestContext::new("conv-1");
        let result = tool.execute(&ctx, serde_json::json!({"command": "echo hi"})).await;
        assert!(!result.is_error);
        assert!(result.content.contains("hi"));
    }

    #[tokio::test]
    async fn blocks_denied_command() {
        let tool = ExecuteCommandTool;
        let ctx = RequestContext::new("conv-1");
        let result = tool
            .execute(&ctx, serde_json::json!({"command": "rm -rf /"}))
            .await;
        assert!(result.is_error);
    }
}
