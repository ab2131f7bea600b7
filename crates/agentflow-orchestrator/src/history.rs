//! Message history builder: a pure function of its inputs, no I/O,
//! deterministic given the same history and prompt.

use agentflow_core::{Message, Role};

/// Build the neutral message list for one generation call: an optional
/// leading system message, the stored conversation history verbatim
/// (assistant tool calls stay paired with their tool-role results), then the
/// new user prompt appended last.
pub fn build_messages(system: Option<&str>, history: &[Message], prompt: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    if let Some(system) = system {
        messages.push(Message::system(system));
    }
    messages.extend(history.iter().cloned());
    messages.push(Message::user(prompt));
    messages
}

/// Flat textual projection for providers that do not model chat turns
/// natively: role-labeled lines, system lines hoisted first, ending with
/// the new prompt.
pub fn build_plain_text(system: Option<&str>, history: &[Message], prompt: &str) -> String {
    let mut lines = Vec::with_capacity(history.len() + 2);
    if let Some(system) = system {
        lines.push(format!("System: {system}"));
    }
    for message in history {
        match message.role {
            Role::System => lines.push(format!("System: {}", message.content)),
            Role::User => lines.push(format!("User: {}", message.content)),
            Role::Assistant => lines.push(format!("Assistant: {}", message.content)),
            Role::Tool => {
                let name = message.name.as_deref().unwrap_or("tool");
                lines.push(format!("Tool {name} result: {}", message.content));
            }
        }
    }
    lines.push(format!("User: {prompt}"));
    lines.join("\n")
}
