use std::collections::HashMap;

use serde::Deserialize;

use agentflow_core::ToolCallDescriptor;

use crate::error::{ProviderError, Result};
use crate::types::{ChatResponse, Usage};

#[derive(Deserialize)]
pub(crate) struct ApiResponse {
    pub(crate) model: String,
    pub(crate) choices: Vec<Choice>,
    pub(crate) usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
pub(crate) struct Choice {
    pub(crate) message: ApiMessage,
    pub(crate) finish_reason: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct ApiMessage {
    pub(crate) content: Option<String>,
    pub(crate) tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Deserialize)]
pub(crate) struct ApiToolCall {
    pub(crate) id: String,
    pub(crate) function: ApiFunction,
}

#[derive(Deserialize)]
pub(crate) struct ApiFunction {
    pub(crate) name: String,
    pub(crate) arguments: String,
}

#[derive(Deserialize)]
pub(crate) struct ApiUsage {
    pub(crate) prompt_tokens: u32,
    pub(crate) completion_tokens: u32,
}

pub(crate) fn parse_response(body: &str, provider_name: &str) -> Result<ChatResponse> {
    let resp: ApiResponse = serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let choice = resp.choices.into_iter().next();
    let content = choice
        .as_ref()
        .and_then(|c| c.message.content.clone())
        .unwrap_or_default();

    let tool_calls: Vec<ToolCallDescriptor> = choice
        .as_ref()
        .and_then(|c| c.message.tool_calls.as_ref())
        .map(|calls| {
            calls
                .iter()
                .map(|tc| ToolCallDescriptor {
                    id: tc.id.clone(),
                    name: tc.function.name.clone(),
                    arguments: tc.function.arguments.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    let raw_reason = choice.and_then(|c| c.finish_reason).unwrap_or_default();
    let stop_reason = if raw_reason == "tool_calls" {
        "tool_use".to_string()
    } else {
        raw_reason
    };

    let mut metadata = HashMap::new();
    metadata.insert("provider".to_string(), serde_json::json!(provider_name));

    Ok(ChatResponse {
        content,
        model: resp.model,
        stop_reason,
        usage: Usage {
            input: resp.usage.as_ref().map(|u| u.prompt_tokens).unwrap_or(0),
            output: resp.usage.as_ref().map(|u| u.completion_tokens).unwrap_or(0),
        },
        tool_calls,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentflow_core::ErrorCode;

    #[test]
    fn parses_plain_completion() {
        let body = r#"{
            "model": "gpt-4o-mini",
            "choices": [{"message": {"content": "hello there"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 4}
        }"#;
        let response = parse_response(body, "openai").unwrap();
        assert_eq!(response.content, "hello there");
        assert_eq!(response.stop_reason, "stop");
        assert_eq!(response.usage.total(), 14);
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.metadata["provider"], "openai");
    }

    #[test]
    fn maps_tool_calls_finish_reason_to_tool_use() {
        let body = r#"{
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{"id": "call_1", "function": {"name": "get_weather", "arguments": "{\"city\":\"nyc\"}"}}]
                },
                "finish_reason": "tool_calls"
            }]
        }"#;
        let response = parse_response(body, "openai").unwrap();
        assert_eq!(response.stop_reason, "tool_use");
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "get_weather");
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = parse_response("not json", "openai").unwrap_err();
        assert_eq!(err.code(), "DECODE_ERROR");
    }
}
