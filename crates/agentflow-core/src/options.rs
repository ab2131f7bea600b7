//! Provider-neutral generation options bag.

use serde::{Deserialize, Serialize};

/// Default iteration cap for the tool-calling loop.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;
/// Default streaming event-channel buffer capacity.
pub const DEFAULT_STREAM_BUFFER_SIZE: usize = 100;

/// JSON-schema response-format constraint, when the provider supports one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFormat {
    pub name: String,
    pub schema: serde_json::Value,
}

/// Streaming-specific knobs, supplied per stream call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// When false (default), content deltas from non-final tool-loop
    /// iterations are captured and replayed rather than forwarded live.
    #[serde(default)]
    pub include_intermediate_messages: bool,
    #[serde(default)]
    pub include_thinking: bool,
    #[serde(default)]
    pub include_tool_progress: bool,
}

fn default_buffer_size() -> usize {
    DEFAULT_STREAM_BUFFER_SIZE
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_STREAM_BUFFER_SIZE,
            include_intermediate_messages: false,
            include_thinking: false,
            include_tool_progress: true,
        }
    }
}

/// Provider-neutral generation options. Any field left `None`/default takes
/// the provider's or orchestrator's own default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_config: Option<StreamConfig>,
}

impl GenerationOptions {
    pub fn max_iterations_or_default(&self) -> usize {
        self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS)
    }
}
