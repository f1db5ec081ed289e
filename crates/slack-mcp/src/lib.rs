//! # Slack MCP
//!
//! This crate provides an MCP (Model Context Protocol) server exposing the
//! Slack Web API as tools, with automatic rotation of expiring credentials.
//!
//! ## Overview
//!
//! The slack-mcp crate handles:
//! - **Dispatch**: Authenticated Web API calls through [`SlackClient`]
//! - **Rotation**: One refresh-and-retry when Slack reports `token_expired`
//! - **Tools**: Declarative wrappers for 28 Web API methods
//! - **JSON-RPC**: MCP protocol implementation over stdio
//!
//! Credentials themselves (store, rotator, env-file persistence) live in the
//! `slack-auth` crate.
//!
//! ## MCP Protocol
//!
//! Supported methods:
//! - `initialize`: Initialize the MCP session
//! - `ping`: Liveness check
//! - `tools/list`: List available tools
//! - `tools/call`: Execute a tool
//!
//! ## Tool Categories
//!
//! - `conversations`: Channels, DMs, history, threads and membership
//! - `messages`: Posting, editing, deleting, reactions and search
//! - `workspace`: Users, team, bookmarks, pins, reminders and files
//!
//! `slack_search_messages` needs a user token (`xoxp-` or `xoxe.xoxp-`); with
//! any other token it returns an error result without calling Slack.
//!
//! ## Usage
//!
//! ### Calling the Web API directly
//!
//! ```rust,no_run
//! use slack_mcp::{SlackClient, SlackConfig};
//! use serde_json::json;
//!
//! async fn post() -> Result<(), slack_mcp::SlackError> {
//!     let client = SlackClient::from_config(&SlackConfig::from_env())?;
//!     let params = json!({"channel": "C123", "text": "Hello"});
//!     let data = client
//!         .post("chat.postMessage", params.as_object().cloned())
//!         .await?;
//!     println!("ok = {}", data["ok"]);
//!     Ok(())
//! }
//! ```
//!
//! ### Handling MCP Requests
//!
//! ```rust,no_run
//! use slack_mcp::{McpServer, McpRequest};
//!
//! async fn handle(server: &McpServer, json: &str) {
//!     let request: McpRequest = serde_json::from_str(json).unwrap();
//!     let response = server.handle_request(request).await;
//!     println!("{}", serde_json::to_string(&response).unwrap());
//! }
//! ```

pub mod clients;
pub mod server;
pub mod stdio;
pub mod tools;
pub mod types;

// Re-export main types
pub use server::{McpServer, McpServerError, McpServerResult, Tool, ToolContext};
pub use types::{
    ContentBlock, McpError, McpRequest, McpResponse, RequestId, ServerCapabilities, ServerInfo,
    ToolAnnotations, ToolCall, ToolCapabilities, ToolDefinition, ToolResult, PROTOCOL_VERSION,
};

// Re-export tool collections
pub use tools::{all_tools, conversation_tools, message_tools, workspace_tools};

// Re-export the Slack client
pub use clients::{ConfigError, HttpVerb, SlackClient, SlackConfig, SlackError};
