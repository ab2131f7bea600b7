//! Tool-calling orchestrator, batch mode: loop → generate → dispatch tool
//! calls → feed results back → repeat, bounded by `max_iterations`, with a
//! final tools-disabled synthesis call on exhaustion.

use std::sync::Arc;

use agentflow_core::{GenerationOptions, Message, RequestContext};
use agentflow_memory::MemoryStore;
use agentflow_providers::{ChatRequest, LlmProvider};
use agentflow_tools::Tool;
use tracing::{debug, info, warn};

use crate::dispatch::{dispatch_all, outcomes_to_messages};
use crate::error::Result;
use crate::history::build_messages;

const SYNTHESIS_PROMPT: &str =
    "Please provide your final response based on the information available. Do not request any additional tools.";

/// Final content plus bookkeeping metadata for one batch tool-calling run.
/// Token totals are summed across every iteration and reported here.
pub struct BatchOutcome {
    pub content: String,
    pub iterations: usize,
    pub max_iterations_hit: bool,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Run the full batch tool-calling loop for one user turn, persisting every
/// appended message to `memory` as the loop progresses.
pub struct BatchOrchestrator {
    provider: Arc<dyn LlmProvider>,
    memory: Arc<dyn MemoryStore>,
    tools: Vec<Box<dyn Tool>>,
}

impl BatchOrchestrator {
    pub fn new(provider: Arc<dyn LlmProvider>, memory: Arc<dyn MemoryStore>, tools: Vec<Box<dyn Tool>>) -> Self {
        Self { provider, memory, tools }
    }

    /// `system` takes priority when given; otherwise `options.system_message`
    /// is used as the system prompt.
    pub async fn run(
        &self,
        ctx: &RequestContext,
        model: &str,
        system: Option<&str>,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<BatchOutcome> {
        let max_iterations = options.max_iterations_or_default();
        let system = system.or(options.system_message.as_deref());
        let history = self.memory.get(ctx, Default::default()).await?;
        let mut messages = build_messages(system, &history, prompt);
        self.memory.add(ctx, Message::user(prompt)).await?;

        let tool_definitions = agentflow_tools::to_definitions(&self.tools);
        let mut input_tokens = 0u32;
        let mut output_tokens = 0u32;

        for iteration in 1..=max_iterations {
            let request = ChatRequest::new(model, messages.clone())
                .with_tools(tool_definitions.clone())
                .with_options(options.clone());

            debug!(iteration, conversation = %ctx.conversation_id, "batch tool loop iteration");
            let response = if tool_definitions.is_empty() {
                self.provider.generate(ctx, &request).await?
            } else {
                self.provider.generate_with_tools(ctx, &request).await?
            };
            input_tokens += response.usage.input;
            output_tokens += response.usage.output;

            if response.tool_calls.is_empty() {
                info!(iteration, "batch tool loop complete — no more tool calls");
                self.memory.add(ctx, Message::assistant(response.content.clone())).await?;
                return Ok(BatchOutcome {
                    content: response.content,
                    iterations: iteration,
                    max_iterations_hit: false,
                    input_tokens,
                    output_tokens,
                });
            }

            let outcomes = dispatch_all(&self.tools, ctx, &response.tool_calls).await;
            let round = outcomes_to_messages(&response.content, &response.tool_calls, &outcomes);
            for message in &round {
                self.memory.add(ctx, message.clone()).await?;
            }
            messages.extend(round);
        }

        warn!(max_iterations, "batch tool loop hit iteration cap, issuing synthesis call");
        messages.push(Message::user(SYNTHESIS_PROMPT));
        let request = ChatRequest::new(model, messages).with_options(options);
        let response = self.provider.generate(ctx, &request).await?;
        input_tokens += response.usage.input;
        output_tokens += response.usage.output;
        self.memory.add(ctx, Message::assistant(response.content.clone())).await?;

        Ok(BatchOutcome {
            content: response.content,
            iterations: max_iterations,
            max_iterations_hit: true,
            input_tokens,
            output_tokens,
        })
    }
}
