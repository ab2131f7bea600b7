//! In-process bounded buffer — the default memory store for a single
//! instance.

use std::collections::VecDeque;
use std::sync::RwLock;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use agentflow_core::{Message, MessageFilter, RequestContext};

use crate::error::{MemoryError, Result};
use crate::store::{MemoryStatistics, MemoryStore};

/// Configuration for `BoundedMemoryStore`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum messages retained per conversation. `None` = unbounded.
    #[serde(default)]
    pub max_size: Option<usize>,
    /// Maximum serialized size, in bytes, of a single message. `None` =
    /// unbounded.
    #[serde(default)]
    pub max_message_size: Option<usize>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_size: Some(500),
            max_message_size: None,
        }
    }
}

struct Conversation {
    messages: RwLock<VecDeque<Message>>,
    summaries: RwLock<VecDeque<Message>>,
}

impl Conversation {
    fn new() -> Self {
        Self {
            messages: RwLock::new(VecDeque::new()),
            summaries: RwLock::new(VecDeque::new()),
        }
    }
}

/// Per-conversation append log held entirely in process memory. Each
/// conversation's sequence is guarded by its own read-write lock: writers
/// exclude readers and other writers on that conversation only.
pub struct BoundedMemoryStore {
    config: MemoryConfig,
    conversations: DashMap<String, Conversation>,
}

impl BoundedMemoryStore {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            conversations: DashMap::new(),
        }
    }
}

impl Default for BoundedMemoryStore {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

#[async_trait]
impl MemoryStore for BoundedMemoryStore {
    async fn add(&self, ctx: &RequestContext, message: Message) -> Result<()> {
        if let Some(max) = self.config.max_message_size {
            let size = message.approx_byte_size();
            if size > max {
                return Err(MemoryError::MessageTooLarge { size, max });
            }
        }

        let key = ctx.storage_key();
        let entry = self
            .conversations
            .entry(key)
            .or_insert_with(Conversation::new);
        let mut messages = entry.messages.write().unwrap();
        messages.push_back(message);
        if let Some(max_size) = self.config.max_size {
            while messages.len() > max_size {
                messages.pop_front();
            }
        }
        Ok(())
    }

    async fn get(&self, ctx: &RequestContext, filter: MessageFilter) -> Result<Vec<Message>> {
        let key = ctx.storage_key();
        let Some(entry) = self.conversations.get(&key) else {
            return Ok(Vec::new());
        };
        let summaries = entry.summaries.read().unwrap();
        let messages = entry.messages.read().unwrap();

        let mut out: Vec<Message> = summaries.iter().cloned().collect();
        out.extend(filter.apply(&messages.make_contiguous_owned()));
        Ok(out)
    }

    async fn clear(&self, ctx: &RequestContext) -> Result<()> {
        self.conversations.remove(&ctx.storage_key());
        Ok(())
    }

    async fn list_conversations(&self, ctx: &RequestContext) -> Result<Vec<String>> {
        let prefix = format!("{}:", ctx.tenant_id);
        Ok(self
            .conversations
            .iter()
            .filter_map(|entry| {
                entry
                    .key()
                    .strip_prefix(&prefix)
                    .map(|conv| conv.to_string())
            })
            .collect())
    }

    async fn statistics(&self, ctx: &RequestContext) -> Result<MemoryStatistics> {
        let prefix = format!("{}:", ctx.tenant_id);
        let mut stats = MemoryStatistics::default();
        for entry in self.conversations.iter() {
            if entry.key().starts_with(&prefix) {
                stats.conversation_count += 1;
                stats.message_count += entry.messages.read().unwrap().len();
            }
        }
        Ok(stats)
    }
}

/// Helper extension so `VecDeque<Message>` can be handed to
/// `MessageFilter::apply`, which expects a contiguous slice.
trait ContiguousOwned {
    fn make_contiguous_owned(&self) -> Vec<Message>;
}

impl ContiguousOwned for VecDeque<Message> {
    fn make_contiguous_owned(&self) -> Vec<Message> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn caps_at_configured_size() {
        let store = BoundedMemoryStore::new(MemoryConfig {
            max_size: Some(3),
            max_message_size: None,
        });
        let ctx = RequestContext::new("conv-1");
        for i in 0..4 {
            store.add(&ctx, Message::user(i.to_string())).await.unwrap();
        }
        let messages = store.get(&ctx, MessageFilter::all()).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, "1");
        assert_eq!(messages[2].content, "3");
    }

    #[tokio::test]
    async fn oversized_message_rejected() {
        let store = BoundedMemoryStore::new(MemoryConfig {
            max_size: None,
            max_message_size: Some(4),
        });
        let ctx = RequestContext::new("conv-1");
        let err = store.add(&ctx, Message::user("12345")).await.unwrap_err();
        assert!(err.to_string().contains("too large"));
        store.add(&ctx, Message::user("1234")).await.unwrap();
    }

    #[tokio::test]
    async fn tenants_are_isolated() {
        let store = BoundedMemoryStore::default();
        let ctx_a = RequestContext::new("conv-1").with_tenant("tenant-a");
        let ctx_b = RequestContext::new("conv-1").with_tenant("tenant-b");
        store.add(&ctx_a, Message::user("secret-a")).await.unwrap();
        let seen_by_b = store.get(&ctx_b, MessageFilter::all()).await.unwrap();
        assert!(seen_by_b.is_empty());
        let seen_by_a = store.get(&ctx_a, MessageFilter::all()).await.unwrap();
        assert_eq!(seen_by_a.len(), 1);
    }

    #[tokio::test]
    async fn clear_empties_conversation() {
        let store = BoundedMemoryStore::default();
        let ctx = RequestContext::new("conv-1");
        store.add(&ctx, Message::assistant("hi")).await.unwrap();
        store.clear(&ctx).await.unwrap();
        let messages = store.get(&ctx, MessageFilter::all()).await.unwrap();
        assert!(messages.is_empty());
    }
}
