use agentflow_core::Message;

use crate::types::ChatRequest;

pub(crate) fn build_request_body(request: &ChatRequest, stream: bool, with_tools: bool) -> serde_json::Value {
    let messages: Vec<serde_json::Value> = request.messages.iter().map(message_to_json).collect();

    let mut body = serde_json::json!({
        "model": request.model,
        "messages": messages,
        "stream": stream,
    });

    let opts = &request.options;
    if let Some(t) = opts.temperature {
        body["temperature"] = serde_json::json!(t);
    }
    if let Some(p) = opts.top_p {
        body["top_p"] = serde_json::json!(p);
    }
    if let Some(p) = opts.frequency_penalty {
        body["frequency_penalty"] = serde_json::json!(p);
    }
    if let Some(p) = opts.presence_penalty {
        body["presence_penalty"] = serde_json::json!(p);
    }
    if !opts.stop_sequences.is_empty() {
        body["stop"] = serde_json::json!(opts.stop_sequences);
    }
    if let Some(format) = &opts.response_format {
        body["response_format"] = serde_json::json!({
            "type": "json_schema",
            "json_schema": { "name": format.name, "schema": format.schema },
        });
    }

    if with_tools && !request.tools.is_empty() {
        let tools: Vec<serde_json::Value> = request
            .tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.to_json_schema(),
                    }
                })
            })
            .collect();
        body["tools"] = serde_json::json!(tools);
    }

    body
}

/// Our neutral `Message` already mirrors the OpenAI chat-completions shape
/// (role, content, `tool_calls`, `tool_call_id`) closely enough that no
/// content-block translation is needed — unlike an Anthropic-style source
/// that represents tool use/results as blocks inside `content`.
fn message_to_json(message: &Message) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    obj.insert("role".to_string(), serde_json::json!(message.role.to_string()));

    if message.content.is_empty() && message.tool_calls.is_some() {
        obj.insert("content".to_string(), serde_json::Value::Null);
    } else {
        obj.insert("content".to_string(), serde_json::json!(message.content));
    }

    if let Some(calls) = &message.tool_calls {
        let tool_calls: Vec<serde_json::Value> = calls
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "type": "function",
                    "function": { "name": c.name, "arguments": c.arguments },
                })
            })
            .collect();
        obj.insert("tool_calls".to_string(), serde_json::json!(tool_calls));
    }

    if let Some(id) = &message.tool_call_id {
        obj.insert("tool_call_id".to_string(), serde_json::json!(id));
    }

    serde_json::Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentflow_core::{ParameterSpec, ToolDefinition};

    #[test]
    fn plain_request_omits_tools() {
        let request = ChatRequest::new("gpt-4o-mini", vec![Message::user("hi")]);
        let body = build_request_body(&request, false, true);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["stream"], false);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn tool_definitions_are_wrapped_as_functions() {
        let mut parameters = std::collections::BTreeMap::new();
        parameters.insert("city".to_string(), ParameterSpec::string("city name").required());
        let tool = ToolDefinition {
            name: "get_weather".to_string(),
            description: "look up weather".to_string(),
            parameters,
        };
        let request = ChatRequest::new("gpt-4o-mini", vec![Message::user("weather?")]).with_tools(vec![tool]);
        let body = build_request_body(&request, false, true);
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "get_weather");
        assert_eq!(body["tools"][0]["function"]["parameters"]["required"][0], "city");
    }

    #[test]
    fn assistant_tool_call_message_has_null_content() {
        let call = agentflow_core::ToolCallDescriptor {
            id: "call_1".to_string(),
            name: "get_weather".to_string(),
            arguments: "{}".to_string(),
        };
        let message = Message::assistant_with_tool_calls("", vec![call]);
        let json = message_to_json(&message);
        assert!(json["content"].is_null());
        assert_eq!(json["tool_calls"][0]["function"]["name"], "get_weather");
    }

    #[test]
    fn tool_result_message_carries_tool_call_id() {
        let message = Message::tool_result("call_1", "get_weather", "72F and sunny");
        let json = message_to_json(&message);
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call_1");
        assert_eq!(json["content"], "72F and sunny");
    }
}
