//! The provider adapter contract: four operations, translation
//! requirements, and streaming semantics shared by every backend.

use async_trait::async_trait;
use tokio::sync::mpsc;

use agentflow_core::{RequestContext, StreamEvent};

use crate::error::Result;
use crate::types::ChatRequest;

/// Common interface for all LLM providers. Adapters are interchangeable:
/// the orchestrator depends only on this contract, never on provider-specific
/// types.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging and error messages, and the
    /// `metadata["provider"]` value on every response.
    fn name(&self) -> &str;

    /// Single-shot generation, no tools in play.
    async fn generate(&self, ctx: &RequestContext, request: &ChatRequest)
        -> Result<crate::types::ChatResponse>;

    /// Generation with `request.tools` exposed to the model.
    async fn generate_with_tools(
        &self,
        ctx: &RequestContext,
        request: &ChatRequest,
    ) -> Result<crate::types::ChatResponse>;

    /// Stream a response with no tools in play. Events are sent on `tx` in
    /// the order emitted; the adapter is responsible for `message_start` /
    /// `message_stop` framing and the ordering guarantees that go with it.
    async fn stream(
        &self,
        ctx: &RequestContext,
        request: &ChatRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<()>;

    /// Stream a response with `request.tools` exposed, including incremental
    /// tool-call assembly as the adapter's wire format delivers it.
    async fn stream_with_tools(
        &self,
        ctx: &RequestContext,
        request: &ChatRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<()>;
}
