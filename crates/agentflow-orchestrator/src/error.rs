use agentflow_core::ErrorCode;
use agentflow_memory::MemoryError;
use agentflow_providers::ProviderError;
use thiserror::Error;

/// Orchestrator-level error taxonomy. A missing or failing tool is *not*
/// represented here — it is materialized as a textual tool result and fed
/// back to the model, never surfaced as an error up the call stack.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("tool registry error: {0}")]
    ToolRegistry(String),
}

impl ErrorCode for OrchestratorError {
    fn code(&self) -> &'static str {
        match self {
            OrchestratorError::Memory(e) => e.code(),
            OrchestratorError::Provider(e) => e.code(),
            OrchestratorError::ToolRegistry(_) => "TOOL_REGISTRY_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
