//! The streaming event bus protocol: a tagged union of event kinds rather
//! than per-event subtypes, so the orchestrator and adapters share one
//! event type across the whole streaming path.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::message::ToolCallDescriptor;

/// One event on a streaming response channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEvent {
    pub kind: StreamEventKind,
    /// Unix epoch milliseconds. Stamped by the producer at emission time.
    pub timestamp_ms: i64,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCallDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamEventKind {
    MessageStart,
    ContentDelta,
    ContentComplete,
    ToolUse,
    ToolResult,
    Thinking,
    Error,
    MessageStop,
}

impl StreamEvent {
    fn bare(kind: StreamEventKind, timestamp_ms: i64) -> Self {
        Self {
            kind,
            timestamp_ms,
            metadata: HashMap::new(),
            content: None,
            tool_call: None,
            error: None,
        }
    }

    pub fn message_start(timestamp_ms: i64) -> Self {
        Self::bare(StreamEventKind::MessageStart, timestamp_ms)
    }

    pub fn message_stop(timestamp_ms: i64) -> Self {
        Self::bare(StreamEventKind::MessageStop, timestamp_ms)
    }

    pub fn content_delta(timestamp_ms: i64, text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Self::bare(StreamEventKind::ContentDelta, timestamp_ms)
        }
    }

    pub fn content_complete(timestamp_ms: i64, text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Self::bare(StreamEventKind::ContentComplete, timestamp_ms)
        }
    }

    pub fn thinking(timestamp_ms: i64, text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Self::bare(StreamEventKind::Thinking, timestamp_ms)
        }
    }

    pub fn tool_use(timestamp_ms: i64, call: ToolCallDescriptor) -> Self {
        Self {
            tool_call: Some(call),
            ..Self::bare(StreamEventKind::ToolUse, timestamp_ms)
        }
    }

    /// `id`/`name`/`arguments` plus the rendered `result` text go in
    /// metadata as `{id, name, arguments, result}`.
    pub fn tool_result(
        timestamp_ms: i64,
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("id".to_string(), serde_json::json!(id.into()));
        metadata.insert("name".to_string(), serde_json::json!(name.into()));
        metadata.insert("arguments".to_string(), serde_json::json!(arguments.into()));
        metadata.insert("result".to_string(), serde_json::json!(result.into()));
        Self {
            metadata,
            ..Self::bare(StreamEventKind::ToolResult, timestamp_ms)
        }
    }

    pub fn error(timestamp_ms: i64, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::bare(StreamEventKind::Error, timestamp_ms)
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            StreamEventKind::MessageStop | StreamEventKind::Error
        )
    }
}
