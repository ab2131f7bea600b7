//! The summarization collaborator: Redis-backed summarization uses the same
//! LLM-call interface as the orchestrator rather than a separate engine.
//! This crate only depends on the narrow capability it needs — turning a
//! transcript into a condensed paragraph — so it never depends on the
//! providers crate. The orchestrator crate supplies the real implementation
//! by wrapping an `LlmProvider`.

use async_trait::async_trait;

use crate::error::Result;

/// Fixed instruction text prepended to every summarization call.
pub const SUMMARIZATION_INSTRUCTION: &str =
    "Summarize the following conversation concisely, preserving key information and context";

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Condense `transcript` (already rendered as plain text) into a short
    /// summary. Failures here are non-fatal to the originating `add` call.
    async fn summarize(&self, transcript: &str) -> Result<String>;
}
