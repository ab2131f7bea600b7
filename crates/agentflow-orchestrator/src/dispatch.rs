//! Parallel tool dispatch: one future per tool call, fanned out with
//! `futures_util::future::join_all`, collected back into call order rather
//! than completion order. A single failing or missing tool never aborts its
//! siblings or the iteration — failures are materialized as textual tool
//! results instead.

use agentflow_core::{Message, RequestContext, ToolCallDescriptor};
use agentflow_tools::Tool;

/// The outcome of one dispatched tool call, always `Ok` from the caller's
/// perspective — failures are folded into `content` so the loop can feed
/// them straight back to the model.
pub struct ToolOutcome {
    pub call: ToolCallDescriptor,
    pub content: String,
    pub is_error: bool,
}

/// Run every call in `calls` concurrently against `tools`, returning results
/// in the same order the calls were given — execution parallelism never
/// reorders tool results.
pub async fn dispatch_all(
    tools: &[Box<dyn Tool>],
    ctx: &RequestContext,
    calls: &[ToolCallDescriptor],
) -> Vec<ToolOutcome> {
    let futures = calls.iter().map(|call| dispatch_one(tools, ctx, call));
    futures_util::future::join_all(futures).await
}

async fn dispatch_one(tools: &[Box<dyn Tool>], ctx: &RequestContext, call: &ToolCallDescriptor) -> ToolOutcome {
    let Some(tool) = agentflow_tools::find(tools, &call.name) else {
        return ToolOutcome {
            call: call.clone(),
            content: format!("Error: tool '{}' not found", call.name),
            is_error: true,
        };
    };

    let arguments: serde_json::Value = match serde_json::from_str(&call.arguments) {
        Ok(v) => v,
        Err(e) => {
            return ToolOutcome {
                call: call.clone(),
                content: format!("Error executing tool: malformed arguments: {e}"),
                is_error: true,
            };
        }
    };

    let cancellation = ctx.cancellation.clone();
    let result = tokio::select! {
        result = tool.execute(ctx, arguments) => result,
        _ = cancellation.cancelled() => {
            return ToolOutcome {
                call: call.clone(),
                content: "Error executing tool: cancelled".to_string(),
                is_error: true,
            };
        }
    };
    if result.is_error {
        ToolOutcome {
            call: call.clone(),
            content: format!("Error executing tool: {}", result.content),
            is_error: true,
        }
    } else {
        ToolOutcome {
            call: call.clone(),
            content: result.content,
            is_error: false,
        }
    }
}

/// Render one tool-calling round as memory/history messages: the assistant
/// turn carrying the calls, then one tool-role message per outcome in call
/// order.
pub fn outcomes_to_messages(content: &str, calls: &[ToolCallDescriptor], outcomes: &[ToolOutcome]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(outcomes.len() + 1);
    messages.push(Message::assistant_with_tool_calls(content, calls.to_vec()));
    for outcome in outcomes {
        messages.push(Message::tool_result(
            outcome.call.id.clone(),
            outcome.call.name.clone(),
            outcome.content.clone(),
        ));
    }
    messages
}
