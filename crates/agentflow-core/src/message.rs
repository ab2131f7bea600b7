//! The provider-neutral message model shared by memory, tools, providers,
//! and the orchestrator.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a single conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A single tool invocation requested by the model inside an assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallDescriptor {
    /// Unique id minted by the provider (e.g. `call_abc123`).
    pub id: String,
    pub name: String,
    /// Raw JSON-text arguments, as emitted by the model. Kept as text
    /// (rather than a parsed `Value`) because streaming assembly appends to
    /// it incrementally before it is valid JSON.
    pub arguments: String,
}

/// A single conversational turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Present only on `role = assistant` messages that invoke tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallDescriptor>>,
    /// Present only on `role = tool` messages; references the assistant
    /// tool call this message answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool name, present only on tool-result messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
            name: None,
            metadata: HashMap::new(),
        }
    }

    /// Construct an assistant turn carrying one or more tool calls. `content`
    /// may be empty when the turn is solely a tool invocation.
    pub fn assistant_with_tool_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCallDescriptor>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Some(tool_calls),
            tool_call_id: None,
            name: None,
            metadata: HashMap::new(),
        }
    }

    /// Construct a tool-result turn answering `tool_call_id`.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
            metadata: HashMap::new(),
        }
    }

    /// Construct the system-role summary message produced by memory-store
    /// summarization. `summarized_count` is recorded in metadata so callers
    /// can audit how much history a summary replaced.
    pub fn summary(content: impl Into<String>, summarized_count: usize, summarized_at: i64) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("is_summary".to_string(), serde_json::json!(true));
        metadata.insert(
            "message_count".to_string(),
            serde_json::json!(summarized_count),
        );
        metadata.insert("summarized_at".to_string(), serde_json::json!(summarized_at));
        Self {
            role: Role::System,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
            name: None,
            metadata,
        }
    }

    pub fn is_summary(&self) -> bool {
        self.role == Role::System
            && self
                .metadata
                .get("is_summary")
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
    }

    /// Approximate on-wire byte size, used for the `MessageTooLarge` size
    /// cap. Cheap and stable rather than exact: content bytes plus a fixed
    /// overhead per tool call descriptor.
    pub fn approx_byte_size(&self) -> usize {
        let mut size = self.content.len();
        if let Some(calls) = &self.tool_calls {
            for call in calls {
                size += call.id.len() + call.name.len() + call.arguments.len();
            }
        }
        size += self.tool_call_id.as_ref().map(|s| s.len()).unwrap_or(0);
        size += self.name.as_ref().map(|s| s.len()).unwrap_or(0);
        size
    }
}

/// Filter applied by `MemoryStore::get`.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    /// Only return messages whose role is in this set. `None` = all roles.
    pub roles: Option<Vec<Role>>,
    /// Only return the most recent `limit` messages (after role filtering).
    pub limit: Option<usize>,
}

impl MessageFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_roles(roles: Vec<Role>) -> Self {
        Self {
            roles: Some(roles),
            limit: None,
        }
    }

    pub fn tail(limit: usize) -> Self {
        Self {
            roles: None,
            limit: Some(limit),
        }
    }

    pub fn matches(&self, msg: &Message) -> bool {
        match &self.roles {
            Some(roles) => roles.contains(&msg.role),
            None => true,
        }
    }

    /// Apply role filtering then tail-N limiting, in that order.
    pub fn apply(&self, messages: &[Message]) -> Vec<Message> {
        let mut filtered: Vec<Message> = messages
            .iter()
            .filter(|m| self.matches(m))
            .cloned()
            .collect();
        if let Some(limit) = self.limit {
            if filtered.len() > limit {
                filtered = filtered.split_off(filtered.len() - limit);
            }
        }
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_limit_keeps_most_recent() {
        let messages: Vec<Message> = (0..5).map(|i| Message::user(i.to_string())).collect();
        let filtered = MessageFilter::tail(2).apply(&messages);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].content, "3");
        assert_eq!(filtered[1].content, "4");
    }

    #[test]
    fn role_filter_then_tail() {
        let messages = vec![
            Message::system("s1"),
            Message::user("u1"),
            Message::assistant("a1"),
            Message::user("u2"),
            Message::user("u3"),
        ];
        let filtered = MessageFilter {
            roles: Some(vec![Role::User]),
            limit: Some(2),
        }
        .apply(&messages);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].content, "u2");
        assert_eq!(filtered[1].content, "u3");
    }

    #[test]
    fn summary_message_flagged() {
        let msg = Message::summary("condensed history", 12, 1_700_000_000);
        assert!(msg.is_summary());
        assert_eq!(msg.role, Role::System);
        assert_eq!(
            msg.metadata.get("message_count").and_then(|v| v.as_u64()),
            Some(12)
        );
    }
}
