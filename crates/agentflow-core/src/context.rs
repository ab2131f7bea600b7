//! Ambient per-request context: the only tenancy primitive, threaded
//! explicitly rather than carried in thread-local or global state.

use tokio_util::sync::CancellationToken;

/// Literal default tenant id used whenever a caller omits one.
pub const DEFAULT_TENANT: &str = "default";

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub tenant_id: String,
    pub conversation_id: String,
    pub cancellation: CancellationToken,
}

impl RequestContext {
    /// New context for `conversation_id` under the default tenant.
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            tenant_id: DEFAULT_TENANT.to_string(),
            conversation_id: conversation_id.into(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        let tenant_id = tenant_id.into();
        self.tenant_id = if tenant_id.is_empty() {
            DEFAULT_TENANT.to_string()
        } else {
            tenant_id
        };
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Child token for a sub-operation (a single tool execution, a single
    /// Redis round trip) that should be cancelled when this context is, but
    /// can also be cancelled independently without affecting siblings.
    pub fn child_cancellation(&self) -> CancellationToken {
        self.cancellation.child_token()
    }

    /// Storage key for this (tenant, conversation) pair, used as the
    /// `<tenant>:<conversation>` Redis key suffix.
    pub fn storage_key(&self) -> String {
        format!("{}:{}", self.tenant_id, self.conversation_id)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tenant_defaults() {
        let ctx = RequestContext::new("conv-1").with_tenant("");
        assert_eq!(ctx.tenant_id, DEFAULT_TENANT);
    }

    #[test]
    fn storage_key_prefixes_tenant() {
        let ctx = RequestContext::new("conv-1").with_tenant("acme");
        assert_eq!(ctx.storage_key(), "acme:conv-1");
    }
}
