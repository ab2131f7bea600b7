//! Concrete `Summarizer` wrapping an `LlmProvider`, so that Redis
//! summarization uses the same LLM-call interface as the orchestrator
//! rather than a separate engine. `agentflow-memory` only knows the narrow
//! `Summarizer` trait; this is the adapter that closes the loop with a
//! real provider.

use std::sync::Arc;

use agentflow_core::RequestContext;
use agentflow_memory::{MemoryError, Summarizer, SUMMARIZATION_INSTRUCTION};
use agentflow_providers::{ChatRequest, LlmProvider};
use async_trait::async_trait;

pub struct ProviderSummarizer {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl ProviderSummarizer {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self { provider, model: model.into() }
    }
}

#[async_trait]
impl Summarizer for ProviderSummarizer {
    async fn summarize(&self, transcript: &str) -> agentflow_memory::Result<String> {
        let prompt = format!("{SUMMARIZATION_INSTRUCTION}:\n\n{transcript}");
        let request = ChatRequest::new(&self.model, vec![agentflow_core::Message::user(prompt)]);
        // Summarization runs outside any tenant/conversation's own context;
        // a scratch context is sufficient since no memory I/O happens here.
        let ctx = RequestContext::new("summarization");
        let response = self
            .provider
            .generate(&ctx, &request)
            .await
            .map_err(|e| MemoryError::Transport(e.to_string()))?;
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentflow_providers::{ChatResponse, Usage};
    use tokio::sync::mpsc;

    struct StaticProvider;

    #[async_trait]
    impl LlmProvider for StaticProvider {
        fn name(&self) -> &str {
            "static"
        }
        async fn generate(
            &self,
            _ctx: &RequestContext,
            _request: &ChatRequest,
        ) -> agentflow_providers::Result<ChatResponse> {
            Ok(ChatResponse {
                content: "condensed summary".to_string(),
                model: "test-model".to_string(),
                stop_reason: "stop".to_string(),
                usage: Usage { input: 1, output: 1 },
                tool_calls: Vec::new(),
                metadata: Default::default(),
            })
        }
        async fn generate_with_tools(
            &self,
            ctx: &RequestContext,
            request: &ChatRequest,
        ) -> agentflow_providers::Result<ChatResponse> {
            self.generate(ctx, request).await
        }
        async fn stream(
            &self,
            _ctx: &RequestContext,
            _request: &ChatRequest,
            _tx: mpsc::Sender<agentflow_core::StreamEvent>,
        ) -> agentflow_providers::Result<()> {
            Ok(())
        }
        async fn stream_with_tools(
            &self,
            _ctx: &RequestContext,
            _request: &ChatRequest,
            _tx: mpsc::Sender<agentflow_core::StreamEvent>,
        ) -> agentflow_providers::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn summarize_returns_provider_content() {
        let summarizer = ProviderSummarizer::new(Arc::new(StaticProvider), "test-model");
        let summary = summarizer.summarize("user: hi\nassistant: hello").await.unwrap();
        assert_eq!(summary, "condensed summary");
    }
}
