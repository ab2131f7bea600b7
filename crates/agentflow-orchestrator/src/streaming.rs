//! Tool-calling orchestrator, streaming mode: same loop as batch, but
//! content and tool-call activity are surfaced as a live `StreamEvent`
//! sequence, with intermediate-content filtering and strict ordering
//! guarantees.

use std::sync::Arc;

use agentflow_core::{GenerationOptions, Message, RequestContext, StreamEvent};
use agentflow_memory::MemoryStore;
use agentflow_providers::{ChatRequest, LlmProvider};
use agentflow_tools::Tool;
use tokio::sync::mpsc;

use crate::dispatch::{dispatch_all, outcomes_to_messages};
use crate::error::Result;
use crate::history::build_messages;

const SYNTHESIS_PROMPT: &str =
    "Please provide your final response based on the information available. Do not request any additional tools.";

pub struct StreamingOrchestrator {
    provider: Arc<dyn LlmProvider>,
    memory: Arc<dyn MemoryStore>,
    tools: Vec<Box<dyn Tool>>,
}

impl StreamingOrchestrator {
    pub fn new(provider: Arc<dyn LlmProvider>, memory: Arc<dyn MemoryStore>, tools: Vec<Box<dyn Tool>>) -> Self {
        Self { provider, memory, tools }
    }

    /// Run the streaming tool-calling loop, emitting events on `tx`.
    /// `message_start` is sent first and `message_stop` last, unless an
    /// `error` event is emitted — nothing is guaranteed to follow an error.
    /// `system` takes priority when given; otherwise `options.system_message`
    /// is used as the system prompt.
    pub async fn run(
        &self,
        ctx: &RequestContext,
        model: &str,
        system: Option<&str>,
        prompt: &str,
        options: GenerationOptions,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<()> {
        let include_intermediate = options
            .stream_config
            .as_ref()
            .map(|c| c.include_intermediate_messages)
            .unwrap_or(false);
        let max_iterations = options.max_iterations_or_default();
        let system = system.or(options.system_message.as_deref());

        let history = self.memory.get(ctx, Default::default()).await?;
        let mut messages = build_messages(system, &history, prompt);
        self.memory.add(ctx, Message::user(prompt)).await?;

        let tool_definitions = agentflow_tools::to_definitions(&self.tools);
        let has_tools = !tool_definitions.is_empty();

        if tx.send(StreamEvent::message_start(now_ms())).await.is_err() {
            return Ok(());
        }

        // Content deltas from non-final iterations, captured rather than
        // forwarded live when `include_intermediate_messages` is false and
        // tools are in play.
        let mut deferred_deltas: Vec<StreamEvent> = Vec::new();

        for _iteration in 1..=max_iterations {
            let request = ChatRequest::new(model, messages.clone())
                .with_tools(tool_definitions.clone())
                .with_options(options.clone());

            let (inner_tx, mut inner_rx) = mpsc::channel(options_buffer_size(&options));
            let send_result = if has_tools {
                self.provider.stream_with_tools(ctx, &request, inner_tx).await
            } else {
                self.provider.stream(ctx, &request, inner_tx).await
            };
            if let Err(e) = send_result {
                let _ = tx.send(StreamEvent::error(now_ms(), e.to_string())).await;
                return Ok(());
            }

            let mut content_buffer = String::new();
            let mut local_deltas = Vec::new();
            let mut tool_calls = Vec::new();
            let mut saw_error = false;

            while let Some(event) = inner_rx.recv().await {
                match event.kind {
                    agentflow_core::StreamEventKind::ContentDelta => {
                        if let Some(text) = &event.content {
                            content_buffer.push_str(text);
                        }
                        local_deltas.push(event);
                    }
                    agentflow_core::StreamEventKind::ToolUse => {
                        if let Some(call) = event.tool_call.clone() {
                            tool_calls.push(call);
                        }
                        let _ = tx.send(event).await;
                    }
                    agentflow_core::StreamEventKind::Error => {
                        saw_error = true;
                        let _ = tx.send(event).await;
                    }
                    agentflow_core::StreamEventKind::MessageStart | agentflow_core::StreamEventKind::MessageStop => {
                        // Framing is owned by this orchestrator, not the adapter's inner stream.
                    }
                    _ => {
                        let _ = tx.send(event).await;
                    }
                }
            }

            if saw_error {
                return Ok(());
            }

            if tool_calls.is_empty() {
                // This iteration is final: forward it live, preceded by a
                // replay of every deferred delta from earlier iterations, in
                // original order.
                if !include_intermediate {
                    for deferred in deferred_deltas.drain(..) {
                        if tx.send(deferred).await.is_err() {
                            return Ok(());
                        }
                    }
                }
                for delta in local_deltas {
                    if tx.send(delta).await.is_err() {
                        return Ok(());
                    }
                }
                self.memory.add(ctx, Message::assistant(content_buffer.clone())).await?;
                let _ = tx.send(StreamEvent::content_complete(now_ms(), content_buffer)).await;
                let _ = tx.send(StreamEvent::message_stop(now_ms())).await;
                return Ok(());
            }

            // Non-final iteration (tool calls present): forward live only
            // when the caller opted into intermediate content.
            if include_intermediate {
                for delta in local_deltas {
                    if tx.send(delta).await.is_err() {
                        return Ok(());
                    }
                }
            } else {
                deferred_deltas.extend(local_deltas);
            }

            let outcomes = dispatch_all(&self.tools, ctx, &tool_calls).await;
            for outcome in &outcomes {
                let _ = tx
                    .send(StreamEvent::tool_result(
                        now_ms(),
                        outcome.call.id.clone(),
                        outcome.call.name.clone(),
                        outcome.call.arguments.clone(),
                        outcome.content.clone(),
                    ))
                    .await;
            }

            let round = outcomes_to_messages(&content_buffer, &tool_calls, &outcomes);
            for message in &round {
                self.memory.add(ctx, message.clone()).await?;
            }
            messages.extend(round);
        }

        // Iteration cap exhausted: one final tools-disabled synthesis call,
        // streamed live regardless of the intermediate-filtering setting.
        messages.push(Message::user(SYNTHESIS_PROMPT));
        let request = ChatRequest::new(model, messages).with_options(options);
        let (inner_tx, mut inner_rx) = mpsc::channel(100);
        if let Err(e) = self.provider.stream(ctx, &request, inner_tx).await {
            let _ = tx.send(StreamEvent::error(now_ms(), e.to_string())).await;
            return Ok(());
        }

        for deferred in deferred_deltas.drain(..) {
            if tx.send(deferred).await.is_err() {
                return Ok(());
            }
        }

        let mut final_content = String::new();
        while let Some(event) = inner_rx.recv().await {
            match event.kind {
                agentflow_core::StreamEventKind::ContentDelta => {
                    if let Some(text) = &event.content {
                        final_content.push_str(text);
                    }
                    if tx.send(event).await.is_err() {
                        return Ok(());
                    }
                }
                agentflow_core::StreamEventKind::Error => {
                    let _ = tx.send(event).await;
                    return Ok(());
                }
                agentflow_core::StreamEventKind::MessageStart | agentflow_core::StreamEventKind::MessageStop => {}
                _ => {
                    let _ = tx.send(event).await;
                }
            }
        }
        self.memory.add(ctx, Message::assistant(final_content.clone())).await?;
        let _ = tx.send(StreamEvent::content_complete(now_ms(), final_content)).await;
        let _ = tx.send(StreamEvent::message_stop(now_ms())).await;
        Ok(())
    }
}

fn options_buffer_size(options: &GenerationOptions) -> usize {
    options
        .stream_config
        .as_ref()
        .map(|c| c.buffer_size)
        .unwrap_or(agentflow_core::options::DEFAULT_STREAM_BUFFER_SIZE)
}

/// Epoch milliseconds. `agentflow_core` deliberately carries no clock of its
/// own — every caller stamps its own events.
fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
