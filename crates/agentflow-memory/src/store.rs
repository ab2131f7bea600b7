//! The memory interface: an append-only, per-conversation ordered message
//! log, keyed by (tenant, conversation).

use async_trait::async_trait;

use agentflow_core::{Message, MessageFilter, RequestContext};

use crate::error::Result;

/// Total conversations and messages observed for one tenant.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct MemoryStatistics {
    pub conversation_count: usize,
    pub message_count: usize,
}

#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Append `message` to the conversation identified by `ctx`. Fails with
    /// `MessageTooLarge` when the store enforces a per-message byte cap.
    async fn add(&self, ctx: &RequestContext, message: Message) -> Result<()>;

    /// Return the current ordered message list for `ctx`, with any current
    /// summaries prepended (oldest first).
    async fn get(&self, ctx: &RequestContext, filter: MessageFilter) -> Result<Vec<Message>>;

    /// Drop all messages and summaries for this conversation.
    async fn clear(&self, ctx: &RequestContext) -> Result<()>;

    /// Enumerate conversation ids under `ctx.tenant_id`.
    async fn list_conversations(&self, ctx: &RequestContext) -> Result<Vec<String>>;

    /// Total conversations and messages for `ctx.tenant_id`.
    async fn statistics(&self, ctx: &RequestContext) -> Result<MemoryStatistics>;
}
