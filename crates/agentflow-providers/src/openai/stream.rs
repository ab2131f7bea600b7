//! OpenAI-compatible SSE streaming, including incremental tool-call
//! assembly: a wire chunk carrying a `name` opens a new accumulator (keyed
//! by the chunk's `index`), subsequent chunks append to its `arguments`
//! text, and the accumulator is flushed to a single `tool_use` event once
//! the choice's `finish_reason` is `tool_calls`.

use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::debug;

use agentflow_core::{StreamEvent, ToolCallDescriptor};

struct ToolCallAccumulator {
    id: String,
    name: String,
    arguments: String,
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Drains `resp`'s SSE body, emitting `content_delta` and `tool_use` events
/// on `tx`. Returns `true` if an `error` event was emitted, in which case
/// the caller must not follow up with `message_stop`.
pub(crate) async fn process_stream(resp: reqwest::Response, tx: mpsc::Sender<StreamEvent>) -> bool {
    use futures_util::StreamExt;

    let mut accumulators: Vec<Option<ToolCallAccumulator>> = Vec::new();
    let mut line_buf = String::new();
    let mut byte_stream = resp.bytes_stream();

    while let Some(chunk) = byte_stream.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                let _ = tx.send(StreamEvent::error(now_ms(), e.to_string())).await;
                return true;
            }
        };

        let text = match std::str::from_utf8(&chunk) {
            Ok(t) => t,
            Err(_) => continue,
        };

        line_buf.push_str(text);
        let lines: Vec<&str> = line_buf.split('\n').collect();
        let (complete, remainder) = lines.split_at(lines.len() - 1);
        let remainder = remainder.first().unwrap_or(&"").to_string();

        for line in complete {
            let line = line.trim();
            let Some(data) = line.strip_prefix("data: ") else {
                continue;
            };
            if data.trim() == "[DONE]" {
                continue;
            }

            let parsed: StreamChunk = match serde_json::from_str(data) {
                Ok(p) => p,
                Err(e) => {
                    debug!(error = %e, "skipping malformed openai stream chunk");
                    continue;
                }
            };

            for choice in &parsed.choices {
                if let Some(content) = &choice.delta.content {
                    if !content.is_empty() {
                        if tx
                            .send(StreamEvent::content_delta(now_ms(), content.clone()))
                            .await
                            .is_err()
                        {
                            return false;
                        }
                    }
                }

                if let Some(tool_calls) = &choice.delta.tool_calls {
                    for delta in tool_calls {
                        let slot = delta.index;
                        if accumulators.len() <= slot {
                            accumulators.resize_with(slot + 1, || None);
                        }
                        let entry = accumulators[slot].get_or_insert_with(|| ToolCallAccumulator {
                            id: String::new(),
                            name: String::new(),
                            arguments: String::new(),
                        });
                        if let Some(id) = &delta.id {
                            entry.id = id.clone();
                        }
                        if let Some(function) = &delta.function {
                            if let Some(name) = &function.name {
                                entry.name = name.clone();
                            }
                            if let Some(args) = &function.arguments {
                                entry.arguments.push_str(args);
                            }
                        }
                    }
                }

                if choice.finish_reason.as_deref() == Some("tool_calls") {
                    for slot in accumulators.drain(..).flatten() {
                        let call = ToolCallDescriptor {
                            id: slot.id,
                            name: slot.name,
                            arguments: slot.arguments,
                        };
                        if tx.send(StreamEvent::tool_use(now_ms(), call)).await.is_err() {
                            return false;
                        }
                    }
                }
            }
        }

        line_buf = remainder;
    }

    false
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    content: Option<String>,
    tool_calls: Option<Vec<StreamToolCallDelta>>,
}

#[derive(Deserialize)]
struct StreamToolCallDelta {
    index: usize,
    id: Option<String>,
    function: Option<StreamFunctionDelta>,
}

#[derive(Deserialize)]
struct StreamFunctionDelta {
    name: Option<String>,
    arguments: Option<String>,
}
