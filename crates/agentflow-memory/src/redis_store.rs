//! Redis-backed memory store: TTL, size caps, retrying writes, and
//! automatic summarization of old history.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use agentflow_core::{Message, MessageFilter, RequestContext};

use crate::compression::{Compressor, IdentityCompressor};
use crate::error::{MemoryError, Result};
use crate::store::{MemoryStatistics, MemoryStore};
use crate::summarizer::Summarizer;

/// Retry policy for a single Redis round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub attempts: u32,
    pub interval_ms: u64,
    pub factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            interval_ms: 100,
            factor: 2.0,
        }
    }
}

impl RetryConfig {
    fn backoff(&self, attempt: u32) -> Duration {
        let ms = self.interval_ms as f64 * self.factor.powi(attempt as i32);
        Duration::from_millis(ms as u64)
    }
}

/// Summarization knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizationConfig {
    pub enabled: bool,
    /// Main-list length at which summarization triggers.
    pub message_threshold: usize,
    /// Messages to retain unsummarized at the head... no, at the *tail* —
    /// the most recent `keep_count` messages stay in the main list.
    pub keep_count: usize,
    /// Maximum summaries retained; oldest dropped on overflow.
    pub summary_count: usize,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        let threshold = 50;
        Self {
            enabled: true,
            message_threshold: threshold,
            keep_count: threshold / 3,
            summary_count: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisMemoryConfig {
    pub ttl_secs: u64,
    pub key_prefix: String,
    pub max_message_size: Option<usize>,
    #[serde(default)]
    pub retries: RetryConfig,
    #[serde(default)]
    pub summarization: SummarizationConfig,
}

impl Default for RedisMemoryConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60 * 60 * 24 * 7, // 7 days
            key_prefix: "agent:memory:".to_string(),
            max_message_size: Some(64 * 1024),
            retries: RetryConfig::default(),
            summarization: SummarizationConfig::default(),
        }
    }
}

/// Redis-backed `MemoryStore`. Redis is the source of truth; the store
/// keeps no local cache.
pub struct RedisMemoryStore {
    conn: ConnectionManager,
    config: RedisMemoryConfig,
    compressor: Arc<dyn Compressor>,
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl RedisMemoryStore {
    pub async fn connect(redis_url: &str, config: RedisMemoryConfig) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(MemoryError::from)?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(MemoryError::from)?;
        Ok(Self {
            conn,
            config,
            compressor: Arc::new(IdentityCompressor),
            summarizer: None,
        })
    }

    pub fn with_compressor(mut self, compressor: Arc<dyn Compressor>) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    fn list_key(&self, ctx: &RequestContext) -> String {
        format!("{}{}", self.config.key_prefix, ctx.storage_key())
    }

    fn summary_key(&self, ctx: &RequestContext) -> String {
        format!("{}summary:{}", self.config.key_prefix, ctx.storage_key())
    }

    fn encode(&self, message: &Message) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(message).map_err(|e| MemoryError::Decode(e.to_string()))?;
        Ok(self.compressor.compress(&json))
    }

    fn decode(&self, raw: &[u8]) -> Result<Message> {
        let json = self.compressor.decompress(raw);
        serde_json::from_slice(&json).map_err(|e| MemoryError::Decode(e.to_string()))
    }

    /// Run `op` with the configured exponential-backoff retry policy.
    /// Connection-level failures retry; everything else surfaces immediately.
    async fn with_retry<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = redis::RedisResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if is_retryable(&err) && attempt < self.config.retries.attempts => {
                    let delay = self.config.retries.backoff(attempt);
                    warn!(attempt, error = %err, delay_ms = delay.as_millis() as u64, "retrying redis operation");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(MemoryError::from(err)),
            }
        }
    }

    async fn refresh_ttl(&self, key: &str) -> Result<()> {
        let conn = self.conn.clone();
        let ttl = self.config.ttl_secs as i64;
        self.with_retry(|| {
            let mut conn = conn.clone();
            let key = key.to_owned();
            async move { conn.expire::<_, ()>(key, ttl).await }
        })
        .await
    }

    /// Summarize the oldest messages once the main list reaches
    /// `message_threshold`. Failures are logged and swallowed — they never
    /// fail the `add` that triggered this check.
    async fn summarize_if_needed(&self, ctx: &RequestContext) {
        let cfg = &self.config.summarization;
        if !cfg.enabled {
            return;
        }
        let Some(summarizer) = &self.summarizer else {
            return;
        };

        let list_key = self.list_key(ctx);
        let mut conn = self.conn.clone();
        let len: usize = match conn.llen(&list_key).await {
            Ok(n) => n,
            Err(err) => {
                warn!(error = %err, "summarization: failed to read list length");
                return;
            }
        };
        if len < cfg.message_threshold || len <= cfg.keep_count {
            return;
        }

        let to_summarize = len - cfg.keep_count;
        let raw: Vec<Vec<u8>> = match conn.lrange(&list_key, 0, (to_summarize - 1) as isize).await {
            Ok(v) => v,
            Err(err) => {
                warn!(error = %err, "summarization: failed to read oldest messages");
                return;
            }
        };
        let messages: Vec<Message> = raw.iter().filter_map(|b| self.decode(b).ok()).collect();
        if messages.is_empty() {
            return;
        }

        let transcript = render_transcript(&messages);
        let summary_text = match summarizer.summarize(&transcript).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, conversation = %ctx.conversation_id, "summarization call failed");
                return;
            }
        };

        let summarized_at = chrono::Utc::now().timestamp();
        let summary = Message::summary(summary_text, messages.len(), summarized_at);
        let summary_key = self.summary_key(ctx);
        let encoded = match self.encode(&summary) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(error = %err, "summarization: failed to encode summary message");
                return;
            }
        };

        if let Err(err) = conn.rpush::<_, _, ()>(&summary_key, encoded).await {
            warn!(error = %err, "summarization: failed to append summary");
            return;
        }
        // Keep only the newest `summary_count` summaries (oldest dropped first).
        let keep_from = -(cfg.summary_count as isize);
        let _ = conn.ltrim::<_, ()>(&summary_key, keep_from, -1).await;
        let _ = self.refresh_ttl(&summary_key).await;

        if let Err(err) = conn
            .lpop::<_, Vec<Vec<u8>>>(&list_key, std::num::NonZeroUsize::new(to_summarize))
            .await
        {
            warn!(error = %err, "summarization: failed to trim summarized messages");
            return;
        }

        info!(
            conversation = %ctx.conversation_id,
            summarized = messages.len(),
            "summarized oldest conversation history"
        );
    }
}

fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_retryable(err: &redis::RedisError) -> bool {
    err.is_io_error() || err.is_connection_dropped() || err.is_timeout()
}

/// Race `fut` against `ctx`'s cancellation, surfacing `MemoryError::Cancelled`
/// the moment the caller asks for it rather than waiting out the Redis round
/// trip.
async fn cancellable<T>(ctx: &RequestContext, fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    tokio::select! {
        result = fut => result,
        _ = ctx.cancellation.cancelled() => Err(MemoryError::Cancelled),
    }
}

#[async_trait]
impl MemoryStore for RedisMemoryStore {
    async fn add(&self, ctx: &RequestContext, message: Message) -> Result<()> {
        if let Some(max) = self.config.max_message_size {
            let size = message.approx_byte_size();
            if size > max {
                return Err(MemoryError::MessageTooLarge { size, max });
            }
        }

        let key = self.list_key(ctx);
        let encoded = self.encode(&message)?;

        let mut conn = self.conn.clone();
        debug!(conversation = %ctx.conversation_id, "appending message to redis list");
        cancellable(ctx, async {
            self.with_retry(|| {
                let mut conn = conn.clone();
                let encoded = encoded.clone();
                let key = key.clone();
                async move { conn.rpush::<_, _, ()>(&key, encoded).await }
            })
            .await
        })
        .await?;
        cancellable(ctx, self.refresh_ttl(&key)).await?;

        cancellable(ctx, async {
            self.summarize_if_needed(ctx).await;
            Ok(())
        })
        .await?;
        Ok(())
    }

    async fn get(&self, ctx: &RequestContext, filter: MessageFilter) -> Result<Vec<Message>> {
        cancellable(ctx, async {
            let mut conn = self.conn.clone();

            let summary_key = self.summary_key(ctx);
            let raw_summaries: Vec<Vec<u8>> = conn.lrange(&summary_key, 0, -1).await.unwrap_or_default();
            let summaries: Vec<Message> = raw_summaries
                .iter()
                .filter_map(|b| self.decode(b).ok())
                .collect();

            let key = self.list_key(ctx);
            let raw_messages: Vec<Vec<u8>> = conn.lrange(&key, 0, -1).await.map_err(MemoryError::from)?;
            let messages: Vec<Message> = raw_messages
                .iter()
                .filter_map(|b| self.decode(b).ok())
                .collect();

            let mut out = summaries;
            out.extend(filter.apply(&messages));
            Ok(out)
        })
        .await
    }

    async fn clear(&self, ctx: &RequestContext) -> Result<()> {
        cancellable(ctx, async {
            let mut conn = self.conn.clone();
            let key = self.list_key(ctx);
            let summary_key = self.summary_key(ctx);
            // Best-effort over both lists; neither deletion failure is surfaced.
            let _ = conn.del::<_, ()>(&key).await;
            let _ = conn.del::<_, ()>(&summary_key).await;
            Ok(())
        })
        .await
    }

    async fn list_conversations(&self, ctx: &RequestContext) -> Result<Vec<String>> {
        cancellable(ctx, async {
            let mut conn = self.conn.clone();
            let tenant_prefix = format!("{}{}:", self.config.key_prefix, ctx.tenant_id);
            let pattern = format!("{tenant_prefix}*");
            let summary_marker = format!("{}summary:", self.config.key_prefix);

            let mut conversations = Vec::new();
            let mut cursor: u64 = 0;
            loop {
                let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(&pattern)
                    .arg("COUNT")
                    .arg(200)
                    .query_async(&mut conn)
                    .await
                    .map_err(MemoryError::from)?;
                for key in keys {
                    if key.starts_with(&summary_marker) {
                        continue;
                    }
                    if let Some(conv) = key.strip_prefix(&tenant_prefix) {
                        conversations.push(conv.to_string());
                    }
                }
                if next_cursor == 0 {
                    break;
                }
                cursor = next_cursor;
            }
            Ok(conversations)
        })
        .await
    }

    async fn statistics(&self, ctx: &RequestContext) -> Result<MemoryStatistics> {
        let conversations = self.list_conversations(ctx).await?;
        cancellable(ctx, async {
            let mut conn = self.conn.clone();
            let mut total_messages = 0usize;
            for conv in &conversations {
                let key = format!("{}{}:{}", self.config.key_prefix, ctx.tenant_id, conv);
                let len: usize = conn.llen(&key).await.unwrap_or(0);
                total_messages += len;
            }
            Ok(MemoryStatistics {
                conversation_count: conversations.len(),
                message_count: total_messages,
            })
        })
        .await
    }
}
