use agentflow_core::ErrorCode;
use thiserror::Error;

/// Error taxonomy for provider adapters: `Transport`, `Provider`, `Decode`,
/// plus the rate-limit and cancellation kinds a real adapter needs to
/// distinguish.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("operation cancelled")]
    Cancelled,
}

impl ErrorCode for ProviderError {
    fn code(&self) -> &'static str {
        match self {
            ProviderError::Transport(_) => "TRANSPORT_ERROR",
            ProviderError::Provider { .. } => "PROVIDER_ERROR",
            ProviderError::Decode(_) => "DECODE_ERROR",
            ProviderError::RateLimited { .. } => "RATE_LIMITED",
            ProviderError::Cancelled => "CANCELLED",
        }
    }
}

impl ProviderError {
    /// Whether an adapter's retry policy should retry this error. Retries
    /// apply only to `Transport` failures and `429`, never to other
    /// `Provider` 4xx/5xx bodies.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Transport(_) | ProviderError::RateLimited { .. })
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_and_transport_are_retryable() {
        assert!(ProviderError::RateLimited { retry_after_ms: 1000 }.is_retryable());
    }

    #[test]
    fn provider_body_errors_are_not_retryable() {
        let err = ProviderError::Provider { status: 400, body: "bad request".to_string() };
        assert!(!err.is_retryable());
        assert_eq!(err.code(), "PROVIDER_ERROR");
    }
}
