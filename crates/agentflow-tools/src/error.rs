use agentflow_core::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool '{name}' not found")]
    NotFound { name: String },

    #[error("tool execution failed: {0}")]
    ExecutionFailed(String),
}

impl ErrorCode for ToolError {
    fn code(&self) -> &'static str {
        match self {
            ToolError::NotFound { .. } => "TOOL_NOT_FOUND",
            ToolError::ExecutionFailed(_) => "TOOL_EXECUTION_FAILED",
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
