//! End-to-End tests for the Slack tools behind the MCP server.
//!
//! Requests go in as JSON-RPC, through `McpServer::handle_request`, the tool
//! layer and the dispatcher, out to a wiremock Slack.

use serde_json::{json, Value};
use slack_auth::{CredentialPair, CredentialRotator, CredentialSources, CredentialStore};
use slack_mcp::{all_tools, McpError, McpRequest, McpServer, SlackClient};
use std::collections::HashMap;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test fixture providing a mock Slack and a server with every tool registered.
struct TestFixture {
    /// Mock Slack server.
    slack: MockServer,
    /// MCP server under test.
    server: McpServer,
    /// Store shared by the tools.
    store: Arc<CredentialStore>,
}

impl TestFixture {
    async fn new(pair: CredentialPair) -> Self {
        let slack = MockServer::start().await;
        let store = Arc::new(CredentialStore::with_pair(
            pair,
            CredentialSources::from_map(HashMap::new()),
            None,
        ));
        let http = reqwest::Client::new();
        let rotator = Arc::new(CredentialRotator::new(
            store.clone(),
            http.clone(),
            format!("{}/api/tooling.tokens.rotate", slack.uri()),
        ));
        let client = Arc::new(SlackClient::new(
            http,
            format!("{}/api", slack.uri()),
            store.clone(),
            rotator,
        ));

        let server = McpServer::slack();
        server.register_tools(all_tools(&client)).await;

        Self {
            slack,
            server,
            store,
        }
    }

    /// Call a tool and return the JSON-RPC result object.
    async fn call(&self, name: &str, arguments: Value) -> Value {
        let request = McpRequest::new(1i64, "tools/call").with_params(json!({
            "name": name,
            "arguments": arguments
        }));
        let response = self.server.handle_request(request).await;
        assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
        response.result.expect("result")
    }
}

fn text_of(result: &Value) -> &str {
    result["content"][0]["text"].as_str().expect("text content")
}

#[tokio::test]
async fn test_tools_list_reports_catalogue() {
    let fixture = TestFixture::new(CredentialPair::access_only("xoxb-1")).await;

    let response = fixture
        .server
        .handle_request(McpRequest::new("list", "tools/list"))
        .await;
    let result = response.result.unwrap();
    let tools = result["tools"].as_array().unwrap();

    assert_eq!(tools.len(), 28);
    let post = tools
        .iter()
        .find(|t| t["name"] == "slack_chat_post_message")
        .unwrap();
    assert_eq!(post["annotations"]["readOnlyHint"], false);
    assert_eq!(post["inputSchema"]["required"], json!(["channel", "text"]));

    let history = tools
        .iter()
        .find(|t| t["name"] == "slack_conversations_history")
        .unwrap();
    assert_eq!(history["annotations"]["readOnlyHint"], true);
}

#[tokio::test]
async fn test_post_message_tool_shapes_params() {
    let fixture = TestFixture::new(CredentialPair::access_only("xoxb-1")).await;

    Mock::given(method("POST"))
        .and(path("/api/chat.postMessage"))
        .and(header("Authorization", "Bearer xoxb-1"))
        .and(body_json(json!({
            "channel": "C1",
            "text": "shipped",
            "thread_ts": "1700000000.000100",
            "reply_broadcast": true,
            "unfurl_links": true,
            "unfurl_media": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "ts": "1700000001.000200"
        })))
        .expect(1)
        .mount(&fixture.slack)
        .await;

    let result = fixture
        .call(
            "slack_chat_post_message",
            json!({
                "channel": "C1",
                "text": "shipped",
                "thread_ts": "1700000000.000100",
                "reply_broadcast": true,
                "unfurl_media": false
            }),
        )
        .await;

    assert_eq!(result["isError"], false);
    let payload: Value = serde_json::from_str(text_of(&result)).unwrap();
    assert_eq!(payload["ts"], "1700000001.000200");
    assert!(text_of(&result).contains('\n'), "payload is pretty-printed");
}

#[tokio::test]
async fn test_platform_error_is_returned_as_payload() {
    let fixture = TestFixture::new(CredentialPair::access_only("xoxb-1")).await;

    Mock::given(method("POST"))
        .and(path("/api/conversations.join"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "error": "method_not_supported_for_channel_type"
        })))
        .expect(1)
        .mount(&fixture.slack)
        .await;

    let result = fixture
        .call("slack_conversations_join", json!({"channel": "D1"}))
        .await;

    // ok: false from Slack is data, not a tool failure.
    assert_eq!(result["isError"], false);
    assert!(text_of(&result).contains("method_not_supported_for_channel_type"));
}

#[tokio::test]
async fn test_search_requires_user_token() {
    let fixture = TestFixture::new(CredentialPair::access_only("xoxb-1")).await;

    Mock::given(method("POST"))
        .and(path("/api/search.messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(0)
        .mount(&fixture.slack)
        .await;

    let result = fixture
        .call("slack_search_messages", json!({"query": "deploy"}))
        .await;

    assert_eq!(result["isError"], true);
    assert!(text_of(&result).contains("requires a user token"));
    assert!(text_of(&result).contains("bot"));
}

#[tokio::test]
async fn test_search_with_rotatable_user_token() {
    let fixture = TestFixture::new(CredentialPair::new("xoxe.xoxp-1", "r1")).await;

    Mock::given(method("POST"))
        .and(path("/api/search.messages"))
        .and(body_json(json!({
            "query": "from:@alice deploy",
            "count": 5,
            "sort": "timestamp",
            "sort_dir": "desc"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "messages": {"total": 0, "matches": []}
        })))
        .expect(1)
        .mount(&fixture.slack)
        .await;

    let result = fixture
        .call(
            "slack_search_messages",
            json!({"query": "from:@alice deploy", "count": 5}),
        )
        .await;
    assert_eq!(result["isError"], false);
}

#[tokio::test]
async fn test_tool_rotates_expired_token() {
    let fixture = TestFixture::new(CredentialPair::new("xoxe.xoxp-old", "r1")).await;

    Mock::given(method("POST"))
        .and(path("/api/auth.test"))
        .and(header("Authorization", "Bearer xoxe.xoxp-old"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": false, "error": "token_expired"})),
        )
        .expect(1)
        .mount(&fixture.slack)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tooling.tokens.rotate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "token": "xoxe.xoxp-new",
            "refresh_token": "r2"
        })))
        .expect(1)
        .mount(&fixture.slack)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth.test"))
        .and(header("Authorization", "Bearer xoxe.xoxp-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "user_id": "U1"})))
        .expect(1)
        .mount(&fixture.slack)
        .await;

    let result = fixture.call("slack_auth_test", json!({})).await;

    assert_eq!(result["isError"], false);
    assert!(text_of(&result).contains("U1"));
    assert_eq!(fixture.store.access_token(), "xoxe.xoxp-new");
}

#[tokio::test]
async fn test_dispatch_failure_is_an_error_result() {
    let fixture = TestFixture::new(CredentialPair::access_only("xoxb-1")).await;

    Mock::given(method("POST"))
        .and(path("/api/team.info"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&fixture.slack)
        .await;

    let result = fixture.call("slack_team_info", json!({})).await;

    assert_eq!(result["isError"], true);
    assert!(text_of(&result).starts_with("Failed to call team.info"));
}

#[tokio::test]
async fn test_missing_credential_is_an_error_result() {
    let fixture = TestFixture::new(CredentialPair::default()).await;

    let result = fixture.call("slack_users_list", json!({})).await;

    assert_eq!(result["isError"], true);
    assert!(text_of(&result).contains("Slack token not found"));
}

#[tokio::test]
async fn test_missing_required_argument_is_invalid_params() {
    let fixture = TestFixture::new(CredentialPair::access_only("xoxb-1")).await;

    let request = McpRequest::new(9i64, "tools/call").with_params(json!({
        "name": "slack_users_info",
        "arguments": {}
    }));
    let response = fixture.server.handle_request(request).await;

    let error = response.error.unwrap();
    assert_eq!(error.code, McpError::INVALID_PARAMS);
    assert!(error.message.contains("user"));
}
