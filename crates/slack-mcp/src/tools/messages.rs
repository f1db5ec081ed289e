//! Message tools
//!
//! Posting, editing and deleting messages, reactions, and message search.

use super::endpoint::{endpoint_tools, EndpointSpec, ParamSpec};
use crate::clients::slack::SlackClient;
use crate::server::Tool;
use std::sync::Arc;

const CATEGORY: &str = "messages";

const CHANNEL: ParamSpec = ParamSpec::string("channel", "Conversation ID").required();
const TS: ParamSpec = ParamSpec::string("ts", "Timestamp of the message").required();
const TIMESTAMP: ParamSpec =
    ParamSpec::string("timestamp", "Timestamp of the message").required();
const REACTION: ParamSpec =
    ParamSpec::string("name", "Emoji name without colons (e.g. 'thumbsup')").required();

/// Message endpoints.
pub static MESSAGE_ENDPOINTS: [EndpointSpec; 6] = [
    EndpointSpec {
        tool: "slack_chat_post_message",
        endpoint: "chat.postMessage",
        description: "Send a message to a channel, DM, or thread. Use thread_ts to reply in a thread.",
        category: CATEGORY,
        read_only: false,
        user_token_only: false,
        params: &[
            CHANNEL,
            ParamSpec::string("text", "Message text").required(),
            ParamSpec::string("thread_ts", "Parent message timestamp to reply in a thread"),
            ParamSpec::boolean("reply_broadcast", "Also post a thread reply to the channel")
                .default_bool(false)
                .only_with("thread_ts"),
            ParamSpec::boolean("unfurl_links", "Unfurl text-based links").default_bool(true),
            ParamSpec::boolean("unfurl_media", "Unfurl media links").default_bool(true),
        ],
    },
    EndpointSpec {
        tool: "slack_chat_update",
        endpoint: "chat.update",
        description: "Update an existing message.",
        category: CATEGORY,
        read_only: false,
        user_token_only: false,
        params: &[
            CHANNEL,
            TS,
            ParamSpec::string("text", "New message text").required(),
        ],
    },
    EndpointSpec {
        tool: "slack_chat_delete",
        endpoint: "chat.delete",
        description: "Delete a message.",
        category: CATEGORY,
        read_only: false,
        user_token_only: false,
        params: &[CHANNEL, TS],
    },
    EndpointSpec {
        tool: "slack_reactions_add",
        endpoint: "reactions.add",
        description: "Add a reaction (emoji) to a message.",
        category: CATEGORY,
        read_only: false,
        user_token_only: false,
        params: &[CHANNEL, TIMESTAMP, REACTION],
    },
    EndpointSpec {
        tool: "slack_reactions_remove",
        endpoint: "reactions.remove",
        description: "Remove a reaction from a message.",
        category: CATEGORY,
        read_only: false,
        user_token_only: false,
        params: &[CHANNEL, TIMESTAMP, REACTION],
    },
    EndpointSpec {
        tool: "slack_search_messages",
        endpoint: "search.messages",
        description: "Search for messages matching a query. Supports Slack search modifiers like 'from:@user', 'in:#channel', 'before:2024-01-01'. Note: Requires a user token (xoxp-), not a bot token.",
        category: CATEGORY,
        read_only: true,
        user_token_only: true,
        params: &[
            ParamSpec::string("query", "Search query").required(),
            ParamSpec::integer("count", "Results per page").default_int(20),
            ParamSpec::string("cursor", "Pagination cursor from a previous response"),
            ParamSpec::string("sort", "Sort by 'score' or 'timestamp'").default_str("timestamp"),
            ParamSpec::string("sort_dir", "Sort direction 'asc' or 'desc'").default_str("desc"),
        ],
    },
];

/// Get all message tools.
pub fn message_tools(client: &Arc<SlackClient>) -> Vec<Arc<dyn Tool>> {
    endpoint_tools(&MESSAGE_ENDPOINTS, client)
}
