//! The `get` tool exposed via Model Context Protocol
//!
//! Validates call arguments, delegates the request to the `HttpClient`
//! implementation and renders the response summary as a single text block.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::ToolError;
use crate::http_client::{HttpClient, HttpResponseSummary};
use crate::mcp::rpc::{json_rpc_error, serialize_result};
use crate::AppState;

pub const GET_TOOL_NAME: &str = "get";

#[macros::mcp_tool(
    name = "get",
    description = "Sends a GET request to the specified URL and returns a Response object"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetTool {
    pub url: String,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![GetTool::tool()]
}

pub fn parse_get_arguments(arguments: Value) -> Result<GetTool, ToolError> {
    let arguments: GetTool = serde_json::from_value(arguments)
        .map_err(|err| ToolError::InvalidArguments(err.to_string()))?;

    if arguments.url.is_empty() {
        return Err(ToolError::MissingUrl);
    }

    Ok(arguments)
}

/// Issues exactly one GET; no retries and no local timeout.
pub async fn execute_get(client: &dyn HttpClient, url: &str) -> Result<String, ToolError> {
    let summary = client.get(url).await?;
    Ok(format_get_response(url, &summary))
}

pub fn format_get_response(url: &str, summary: &HttpResponseSummary) -> String {
    let headers = serde_json::to_string_pretty(&summary.headers).unwrap_or_default();
    let body = serde_json::to_string_pretty(&summary.body).unwrap_or_default();

    // Ends at the final newline; no trailing indentation.
    format!(
        "\nSuccessfully sent a GET request to {url}.\nHere is the response\nstatus code: {}\nheaders: {headers}\nbody: {body}\n",
        summary.status
    )
}

pub fn text_result(text: String, is_error: bool) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(text, None, None))],
        is_error: is_error.then_some(true),
        meta: None,
        structured_content: None,
    }
}

async fn run_tool(state: &AppState, name: &str, arguments: Value) -> Result<String, ToolError> {
    match name {
        GET_TOOL_NAME => {
            let arguments = parse_get_arguments(arguments)?;
            execute_get(state.http_client.as_ref(), &arguments.url).await
        }
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}

/// Every tool failure ends up in the envelope; nothing propagates past here.
pub async fn call_tool(state: &AppState, name: &str, arguments: Value) -> CallToolResult {
    match run_tool(state, name, arguments).await {
        Ok(text) => text_result(text, false),
        Err(err) => {
            warn!(tool = %name, error = %err, "tool call failed");
            text_result(format!("Error: {err}"), true)
        }
    }
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let result = call_tool(
        state,
        &tool_call.name,
        json!(tool_call.arguments.unwrap_or_default()),
    )
    .await;

    serialize_result(id, &result)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{json, Map, Value};

    use super::*;
    use crate::http_client::HttpClientError;

    struct MockClient;

    #[async_trait]
    impl HttpClient for MockClient {
        async fn get(&self, url: &str) -> Result<HttpResponseSummary, HttpClientError> {
            match url {
                "http://unreachable.invalid/" => Err(HttpClientError::Request(
                    "error sending request for url (http://unreachable.invalid/): dns error"
                        .to_string(),
                )),
                _ => Ok(HttpResponseSummary {
                    status: 200,
                    headers: Map::from_iter([(
                        "content-type".to_string(),
                        json!("application/json"),
                    )]),
                    body: json!({ "echo": url }),
                }),
            }
        }
    }

    fn state() -> AppState {
        AppState::new(Arc::new(MockClient))
    }

    fn text_of(result: &CallToolResult) -> String {
        let value = serde_json::to_value(result).expect("tool result serialization");
        value["content"][0]["text"]
            .as_str()
            .expect("text content")
            .to_string()
    }

    fn is_error(result: &CallToolResult) -> bool {
        result.is_error == Some(true)
    }

    #[test]
    fn tools_list_has_single_get_tool() {
        let tools = build_tools_list();
        assert_eq!(tools.len(), 1);

        let tool = serde_json::to_value(&tools[0]).expect("tool serialization");
        assert_eq!(tool["name"], "get");
        assert_eq!(
            tool["description"],
            "Sends a GET request to the specified URL and returns a Response object"
        );
        assert_eq!(tool["inputSchema"]["type"], "object");
        assert_eq!(tool["inputSchema"]["properties"]["url"]["type"], "string");
        assert_eq!(tool["inputSchema"]["required"], json!(["url"]));
    }

    #[test]
    fn parses_valid_arguments() {
        let arguments = parse_get_arguments(json!({ "url": "https://example.com" }))
            .expect("valid arguments");
        assert_eq!(arguments.url, "https://example.com");
    }

    #[test]
    fn ignores_unknown_argument_fields() {
        let arguments = parse_get_arguments(json!({ "url": "https://example.com", "extra": 1 }))
            .expect("valid arguments");
        assert_eq!(arguments.url, "https://example.com");
    }

    #[test]
    fn rejects_missing_url() {
        let error = parse_get_arguments(json!({})).expect_err("missing url must fail");
        assert!(matches!(error, ToolError::InvalidArguments(_)));
        assert!(error.to_string().contains("url"));
    }

    #[test]
    fn rejects_non_string_url() {
        let error = parse_get_arguments(json!({ "url": 42 })).expect_err("number url must fail");
        assert!(matches!(error, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn rejects_empty_url() {
        let error = parse_get_arguments(json!({ "url": "" })).expect_err("empty url must fail");
        assert!(matches!(error, ToolError::MissingUrl));
    }

    #[test]
    fn formats_response_in_fixed_order() {
        let summary = HttpResponseSummary {
            status: 404,
            headers: Map::from_iter([("x-a".to_string(), Value::from("1"))]),
            body: json!({ "missing": true }),
        };

        let text = format_get_response("https://example.com/x", &summary);
        assert_eq!(
            text,
            "\nSuccessfully sent a GET request to https://example.com/x.\nHere is the response\nstatus code: 404\nheaders: {\n  \"x-a\": \"1\"\n}\nbody: {\n  \"missing\": true\n}\n"
        );
    }

    #[tokio::test]
    async fn successful_get_reports_url_status_headers_and_body() {
        let result = call_tool(&state(), "get", json!({ "url": "https://example.com/a" })).await;

        assert!(!is_error(&result));
        let text = text_of(&result);
        assert!(text.contains("https://example.com/a"));
        assert!(text.contains("status code: 200"));
        assert!(text.contains("\"content-type\": \"application/json\""));
        assert!(text.contains("\"echo\": \"https://example.com/a\""));
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_in_band() {
        let result = call_tool(&state(), "post", json!({ "url": "https://example.com" })).await;

        assert!(is_error(&result));
        assert_eq!(text_of(&result), "Error: Unknown tool: post");
    }

    #[tokio::test]
    async fn invalid_arguments_are_reported_in_band() {
        let result = call_tool(&state(), "get", json!({})).await;

        assert!(is_error(&result));
        assert!(text_of(&result).starts_with("Error: Invalid arguments for get request:"));
    }

    #[tokio::test]
    async fn empty_url_is_reported_in_band() {
        let result = call_tool(&state(), "get", json!({ "url": "" })).await;

        assert!(is_error(&result));
        assert_eq!(text_of(&result), "Error: Url should be provided");
    }

    #[tokio::test]
    async fn client_failure_is_reported_in_band() {
        let result = call_tool(&state(), "get", json!({ "url": "http://unreachable.invalid/" })).await;

        assert!(is_error(&result));
        assert_eq!(
            text_of(&result),
            "Error: error sending request for url (http://unreachable.invalid/): dns error"
        );
    }

    #[tokio::test]
    async fn tools_call_without_params_is_invalid_params() {
        let response = handle_tools_call(&state(), Some(json!(7)), None).await;

        assert_eq!(response["id"], 7);
        assert_eq!(response["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn tools_call_wraps_envelope_in_result() {
        let response = handle_tools_call(
            &state(),
            Some(json!(8)),
            Some(json!({ "name": "get", "arguments": { "url": "https://example.com" } })),
        )
        .await;

        assert_eq!(response["id"], 8);
        assert_eq!(response["result"]["content"][0]["type"], "text");
        assert_ne!(response["result"]["isError"], json!(true));
    }
}
