//! Conversation tools
//!
//! Channels, DMs and group DMs: listing, history, threads, membership.

use super::endpoint::{endpoint_tools, EndpointSpec, ParamSpec};
use crate::clients::slack::SlackClient;
use crate::server::Tool;
use std::sync::Arc;

const CATEGORY: &str = "conversations";

const CHANNEL: ParamSpec = ParamSpec::string("channel", "Conversation ID").required();
const LIMIT: ParamSpec = ParamSpec::integer("limit", "Maximum number of items to return").default_int(100);
const CURSOR: ParamSpec = ParamSpec::string("cursor", "Pagination cursor from a previous response");
const OLDEST: ParamSpec = ParamSpec::string("oldest", "Only messages after this timestamp");
const LATEST: ParamSpec = ParamSpec::string("latest", "Only messages before this timestamp");
const INCLUSIVE: ParamSpec =
    ParamSpec::boolean("inclusive", "Include messages at oldest and latest").default_bool(true);

/// Conversation endpoints.
pub static CONVERSATION_ENDPOINTS: [EndpointSpec; 8] = [
    EndpointSpec {
        tool: "slack_list_conversations",
        endpoint: "conversations.list",
        description: "List conversations (channels, DMs, group DMs) the user is a member of. Use types parameter to filter: public_channel, private_channel, mpim (group DMs), im (DMs).",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[
            ParamSpec::string("types", "Comma-separated conversation types")
                .default_str("public_channel,private_channel"),
            LIMIT,
            CURSOR,
            ParamSpec::boolean("exclude_archived", "Leave out archived conversations")
                .default_bool(true),
        ],
    },
    EndpointSpec {
        tool: "slack_get_conversation_info",
        endpoint: "conversations.info",
        description: "Get information about a conversation (channel, DM, or group DM).",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[
            CHANNEL,
            ParamSpec::boolean("include_num_members", "Include the member count")
                .default_bool(true),
        ],
    },
    EndpointSpec {
        tool: "slack_conversations_history",
        endpoint: "conversations.history",
        description: "Fetch message history from a conversation. Returns messages in reverse chronological order.",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[CHANNEL, LIMIT, CURSOR, OLDEST, LATEST, INCLUSIVE],
    },
    EndpointSpec {
        tool: "slack_conversations_replies",
        endpoint: "conversations.replies",
        description: "Get replies (thread messages) for a specific message in a conversation.",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[
            CHANNEL,
            ParamSpec::string("ts", "Timestamp of the parent message").required(),
            LIMIT,
            CURSOR,
            OLDEST,
            LATEST,
            INCLUSIVE,
        ],
    },
    EndpointSpec {
        tool: "slack_conversations_members",
        endpoint: "conversations.members",
        description: "List members of a conversation.",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[CHANNEL, LIMIT, CURSOR],
    },
    EndpointSpec {
        tool: "slack_conversations_join",
        endpoint: "conversations.join",
        description: "Join a public channel.",
        category: CATEGORY,
        read_only: false,
        user_token_only: false,
        params: &[CHANNEL],
    },
    EndpointSpec {
        tool: "slack_conversations_leave",
        endpoint: "conversations.leave",
        description: "Leave a conversation (channel, DM, or group DM).",
        category: CATEGORY,
        read_only: false,
        user_token_only: false,
        params: &[CHANNEL],
    },
    EndpointSpec {
        tool: "slack_conversations_open",
        endpoint: "conversations.open",
        description: "Open or resume a direct message (DM) or multi-person direct message (MPIM).",
        category: CATEGORY,
        read_only: false,
        user_token_only: false,
        params: &[
            ParamSpec::string("users", "Comma-separated user IDs"),
            ParamSpec::string("channel", "Existing DM or MPIM to resume"),
            ParamSpec::boolean("return_im", "Return the full IM channel definition")
                .default_bool(true),
        ],
    },
];

/// Get all conversation tools.
pub fn conversation_tools(client: &Arc<SlackClient>) -> Vec<Arc<dyn Tool>> {
    endpoint_tools(&CONVERSATION_ENDPOINTS, client)
}
