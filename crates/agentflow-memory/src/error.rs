use agentflow_core::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("memory not found for conversation {conversation}")]
    NotFound { conversation: String },

    #[error("operation cancelled")]
    Cancelled,
}

impl ErrorCode for MemoryError {
    fn code(&self) -> &'static str {
        match self {
            MemoryError::MessageTooLarge { .. } => "MESSAGE_TOO_LARGE",
            MemoryError::Transport(_) => "TRANSPORT_ERROR",
            MemoryError::Decode(_) => "DECODE_ERROR",
            MemoryError::NotFound { .. } => "NOT_FOUND",
            MemoryError::Cancelled => "CANCELLED",
        }
    }
}

impl From<redis::RedisError> for MemoryError {
    fn from(err: redis::RedisError) -> Self {
        MemoryError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MemoryError>;
