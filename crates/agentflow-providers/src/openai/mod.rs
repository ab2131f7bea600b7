mod config;
mod request;
mod response;
mod stream;

pub use config::OpenAiConfig;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use agentflow_core::{RequestContext, StreamEvent};

use crate::error::{ProviderError, Result};
use crate::provider::LlmProvider;
use crate::retry::RetryPolicy;
use crate::types::ChatRequest;

/// Reference OpenAI-compatible chat-completions adapter.
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
    retry_policy: RetryPolicy,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .expect("reqwest client builds with static config");
        Self {
            client,
            config,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }

    /// Send `body`, retrying transport failures and 429s per the configured
    /// policy. Other non-2xx `Provider` failures are never retried.
    async fn send_with_retry(&self, body: &serde_json::Value) -> Result<reqwest::Response> {
        let mut attempt = 0;
        loop {
            let result = self
                .client
                .post(self.url())
                .bearer_auth(&self.config.api_key)
                .header("content-type", "application/json")
                .json(body)
                .send()
                .await;

            match result {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if status == 429 {
                        let retry_after_ms = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .map(|secs| secs * 1000)
                            .unwrap_or_else(|| self.retry_policy.backoff(attempt).as_millis() as u64);
                        if attempt < self.retry_policy.max_attempts {
                            warn!(attempt, retry_after_ms, "openai rate limited, retrying");
                            tokio::time::sleep(std::time::Duration::from_millis(retry_after_ms)).await;
                            attempt += 1;
                            continue;
                        }
                        return Err(ProviderError::RateLimited { retry_after_ms });
                    }
                    if !resp.status().is_success() {
                        let body_text = resp.text().await.unwrap_or_default();
                        return Err(ProviderError::Provider { status, body: body_text });
                    }
                    return Ok(resp);
                }
                Err(err) if attempt < self.retry_policy.max_attempts => {
                    let delay = self.retry_policy.backoff(attempt);
                    warn!(attempt, error = %err, delay_ms = delay.as_millis() as u64, "retrying openai request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(ProviderError::Transport(err)),
            }
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, _ctx: &RequestContext, request: &ChatRequest) -> Result<crate::types::ChatResponse> {
        let body = request::build_request_body(request, false, false);
        debug!(model = %request.model, "sending openai request");
        let resp = self.send_with_retry(&body).await?;
        let text = resp.text().await.map_err(ProviderError::Transport)?;
        response::parse_response(&text, self.name())
    }

    async fn generate_with_tools(
        &self,
        _ctx: &RequestContext,
        request: &ChatRequest,
    ) -> Result<crate::types::ChatResponse> {
        let body = request::build_request_body(request, false, true);
        debug!(model = %request.model, tools = request.tools.len(), "sending openai request with tools");
        let resp = self.send_with_retry(&body).await?;
        let text = resp.text().await.map_err(ProviderError::Transport)?;
        response::parse_response(&text, self.name())
    }

    async fn stream(
        &self,
        ctx: &RequestContext,
        request: &ChatRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<()> {
        self.stream_impl(ctx, request, tx, false).await
    }

    async fn stream_with_tools(
        &self,
        ctx: &RequestContext,
        request: &ChatRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<()> {
        self.stream_impl(ctx, request, tx, true).await
    }
}

impl OpenAiProvider {
    async fn stream_impl(
        &self,
        ctx: &RequestContext,
        request: &ChatRequest,
        tx: mpsc::Sender<StreamEvent>,
        with_tools: bool,
    ) -> Result<()> {
        let body = request::build_request_body(request, true, with_tools);
        debug!(model = %request.model, "sending openai streaming request");
        let resp = self.send_with_retry(&body).await?;

        let now_ms = chrono::Utc::now().timestamp_millis();
        if tx.send(StreamEvent::message_start(now_ms)).await.is_err() {
            return Ok(());
        }

        let cancellation = ctx.cancellation.clone();
        let errored = tokio::select! {
            errored = stream::process_stream(resp, tx.clone()) => errored,
            _ = cancellation.cancelled() => {
                let _ = tx.send(StreamEvent::error(chrono::Utc::now().timestamp_millis(), "cancelled")).await;
                true
            }
        };

        if !errored {
            let _ = tx.send(StreamEvent::message_stop(chrono::Utc::now().timestamp_millis())).await;
        }
        Ok(())
    }
}
