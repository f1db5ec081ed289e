//! Slack MCP tools
//!
//! Every tool wraps one Slack Web API method. Tools are grouped by category:
//! conversations, messages and workspace.

pub mod conversations;
pub mod endpoint;
pub mod messages;
pub mod workspace;

pub use conversations::*;
pub use endpoint::{EndpointSpec, ParamKind, ParamSpec, SlackEndpointTool};
pub use messages::*;
pub use workspace::*;

use crate::clients::slack::SlackClient;
use crate::server::Tool;
use std::sync::Arc;

/// Get all available MCP tools.
///
/// Returns a vector containing the tools of every category:
/// - Conversations: listing, history, threads and membership
/// - Messages: posting, editing, reactions and search
/// - Workspace: users, team, bookmarks, pins, reminders and files
///
/// # Example
///
/// ```rust,no_run
/// use slack_mcp::tools::all_tools;
/// use slack_mcp::{SlackClient, SlackConfig};
/// use std::sync::Arc;
///
/// let client = Arc::new(SlackClient::from_config(&SlackConfig::from_env()).unwrap());
/// let tools = all_tools(&client);
/// println!("Available tools: {}", tools.len());
/// ```
pub fn all_tools(client: &Arc<SlackClient>) -> Vec<Arc<dyn Tool>> {
    let mut tools = Vec::new();

    // Conversation tools (8)
    tools.extend(conversation_tools(client));

    // Message tools (6)
    tools.extend(message_tools(client));

    // Workspace tools (14)
    tools.extend(workspace_tools(client));

    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use slack_auth::{CredentialPair, CredentialRotator, CredentialSources, CredentialStore};
    use std::collections::HashMap;

    fn client() -> Arc<SlackClient> {
        let store = Arc::new(CredentialStore::with_pair(
            CredentialPair::access_only("xoxb-test"),
            CredentialSources::from_map(HashMap::new()),
            None,
        ));
        let http = reqwest::Client::new();
        let rotator = Arc::new(CredentialRotator::new(
            store.clone(),
            http.clone(),
            "http://127.0.0.1:9/tooling.tokens.rotate",
        ));
        Arc::new(SlackClient::new(http, "http://127.0.0.1:9", store, rotator))
    }

    #[test]
    fn test_all_tools_count() {
        let tools = all_tools(&client());
        // 8 conversations + 6 messages + 14 workspace = 28 tools
        assert_eq!(tools.len(), 28, "Expected 28 total tools");
    }

    #[test]
    fn test_all_tools_unique_names() {
        let tools = all_tools(&client());
        let mut names = std::collections::HashSet::new();

        for tool in tools {
            let def = tool.definition();
            assert!(
                names.insert(def.name.clone()),
                "Duplicate tool name: {}",
                def.name
            );
            assert!(def.name.starts_with("slack_"));
        }
    }

    #[test]
    fn test_tool_categories() {
        let client = client();
        assert_eq!(conversation_tools(&client).len(), 8);
        assert_eq!(message_tools(&client).len(), 6);
        assert_eq!(workspace_tools(&client).len(), 14);

        for tool in message_tools(&client) {
            assert_eq!(tool.definition().category.as_deref(), Some("messages"));
        }
    }
}
