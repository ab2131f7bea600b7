// Exercises the tool registry helpers (`to_definitions`, `find`) against a
// mixed set of builtin tools, and a write_file -> read_file round trip
// through the `Tool` trait rather than each tool's own internals.

use agentflow_core::RequestContext;
use agentflow_tools::{find, to_definitions, ListFilesTool, ReadFileTool, Tool, WriteFileTool};

fn tool_set() -> Vec<Box<dyn Tool>> {
    vec![Box::new(ReadFileTool), Box::new(WriteFileTool), Box::new(ListFilesTool)]
}

#[test]
fn to_definitions_carries_name_and_required_parameters() {
    let tools = tool_set();
    let definitions = to_definitions(&tools);
    assert_eq!(definitions.len(), 3);

    let write_def = definitions.iter().find(|d| d.name == "write_file").unwrap();
    assert!(write_def.parameters.get("path").unwrap().required);
    assert!(write_def.parameters.get("content").unwrap().required);
}

#[test]
fn find_looks_up_by_name_and_misses_unknown_tools() {
    let tools = tool_set();
    assert!(find(&tools, "read_file").is_some());
    assert!(find(&tools, "list_files").is_some());
    assert!(find(&tools, "delete_everything").is_none());
}

#[tokio::test]
async fn write_then_read_round_trip_through_the_tool_trait() {
    let tools = tool_set();
    let ctx = RequestContext::new("conv-1");
    let dir = std::env::temp_dir().join("agentflow-tools-registry-test");
    let _ = tokio::fs::remove_dir_all(&dir).await;
    let path = dir.join("roundtrip.txt");

    let writer = find(&tools, "write_file").unwrap();
    let write_result = writer
        .execute(
            &ctx,
            serde_json::json!({"path": path.to_str().unwrap(), "content": "hello from a tool"}),
        )
        .await;
    assert!(!write_result.is_error);

    let reader = find(&tools, "read_file").unwrap();
    let read_result = reader.execute(&ctx, serde_json::json!({"path": path.to_str().unwrap()})).await;
    assert!(!read_result.is_error);
    assert_eq!(read_result.content, "hello from a tool");

    let lister = find(&tools, "list_files").unwrap();
    let list_result = lister.execute(&ctx, serde_json::json!({"path": dir.to_str().unwrap()})).await;
    assert!(!list_result.is_error);
    assert!(list_result.content.contains("roundtrip.txt"));
}
