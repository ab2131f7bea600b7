// Exercises the provider-facing public API as an external caller would
// assemble it: config deserialization, request construction, and the
// retry/error decision a caller's own retry loop would make — all without
// touching the network.

use agentflow_core::{Message, ToolCallDescriptor, ToolDefinition};
use agentflow_providers::{ChatRequest, OpenAiConfig, ProviderError, RetryPolicy, Usage};

#[test]
fn openai_config_fills_defaults_from_partial_json() {
    let config: OpenAiConfig = serde_json::from_str(r#"{"api_key": "sk-test"}"#).unwrap();
    assert_eq!(config.api_key, "sk-test");
    assert_eq!(config.base_url, "https://api.openai.com");
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.http_timeout().as_secs(), 60);
    assert!(config.max_tokens.is_none());
}

#[test]
fn openai_config_honors_overrides() {
    let config: OpenAiConfig = serde_json::from_str(
        r#"{"api_key": "sk-test", "base_url": "https://my-proxy.internal", "http_timeout_secs": 5}"#,
    )
    .unwrap();
    assert_eq!(config.base_url, "https://my-proxy.internal");
    assert_eq!(config.http_timeout().as_secs(), 5);
}

#[test]
fn chat_request_builder_carries_tools_and_options_through() {
    let mut parameters = std::collections::BTreeMap::new();
    parameters.insert(
        "city".to_string(),
        agentflow_core::ParameterSpec::string("city name").required(),
    );
    let tool = ToolDefinition {
        name: "get_weather".to_string(),
        description: "look up the weather".to_string(),
        parameters,
    };
    let options = agentflow_core::GenerationOptions {
        temperature: Some(0.2),
        ..Default::default()
    };

    let request = ChatRequest::new("gpt-4o-mini", vec![Message::user("weather in nyc?")])
        .with_tools(vec![tool])
        .with_options(options);

    assert_eq!(request.model, "gpt-4o-mini");
    assert_eq!(request.tools.len(), 1);
    assert_eq!(request.tools[0].name, "get_weather");
    assert_eq!(request.options.temperature, Some(0.2));
}

#[test]
fn usage_total_sums_input_and_output() {
    let usage = Usage { input: 120, output: 45 };
    assert_eq!(usage.total(), 165);
}

/// A caller-side retry loop would check `is_retryable` before consulting a
/// `RetryPolicy` for the next delay — this is the combination the reference
/// adapter performs internally, exercised here through only public types.
#[test]
fn retryable_errors_get_an_increasing_backoff_non_retryable_do_not() {
    let policy = RetryPolicy::default();

    let transport_err = ProviderError::RateLimited { retry_after_ms: 0 };
    assert!(transport_err.is_retryable());
    assert!(policy.backoff(1) > policy.backoff(0));

    let provider_err = ProviderError::Provider { status: 400, body: "bad request".to_string() };
    assert!(!provider_err.is_retryable());
}

#[test]
fn tool_call_descriptor_round_trips_through_json() {
    let call = ToolCallDescriptor {
        id: "call_1".to_string(),
        name: "get_weather".to_string(),
        arguments: r#"{"city":"nyc"}"#.to_string(),
    };
    let json = serde_json::to_string(&call).unwrap();
    let parsed: ToolCallDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.name, "get_weather");
    assert_eq!(parsed.arguments, r#"{"city":"nyc"}"#);
}
