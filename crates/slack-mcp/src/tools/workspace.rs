//! Workspace tools
//!
//! Users, identity, team, bookmarks, pins, reminders and files.

use super::endpoint::{endpoint_tools, EndpointSpec, ParamSpec};
use crate::clients::slack::SlackClient;
use crate::server::Tool;
use std::sync::Arc;

const CATEGORY: &str = "workspace";

const CHANNEL: ParamSpec = ParamSpec::string("channel", "Conversation ID").required();
const TIMESTAMP: ParamSpec =
    ParamSpec::string("timestamp", "Timestamp of the message").required();

/// Workspace endpoints.
pub static WORKSPACE_ENDPOINTS: [EndpointSpec; 14] = [
    EndpointSpec {
        tool: "slack_users_list",
        endpoint: "users.list",
        description: "List all users in the workspace.",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[
            ParamSpec::integer("limit", "Maximum number of users to return").default_int(100),
            ParamSpec::string("cursor", "Pagination cursor from a previous response"),
            ParamSpec::boolean("include_locale", "Include each user's locale").default_bool(false),
        ],
    },
    EndpointSpec {
        tool: "slack_users_info",
        endpoint: "users.info",
        description: "Get information about a user by their ID.",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[ParamSpec::string("user", "User ID").required()],
    },
    EndpointSpec {
        tool: "slack_users_lookup_by_email",
        endpoint: "users.lookupByEmail",
        description: "Find a user by their email address.",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[ParamSpec::string("email", "Email address").required()],
    },
    EndpointSpec {
        tool: "slack_auth_test",
        endpoint: "auth.test",
        description: "Get the current user's identity (who the token belongs to).",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[],
    },
    EndpointSpec {
        tool: "slack_team_info",
        endpoint: "team.info",
        description: "Get information about the workspace (team).",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[],
    },
    EndpointSpec {
        tool: "slack_bookmarks_list",
        endpoint: "bookmarks.list",
        description: "List bookmarks in a channel.",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[CHANNEL.wire("channel_id")],
    },
    EndpointSpec {
        tool: "slack_pins_list",
        endpoint: "pins.list",
        description: "List pinned items in a channel.",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[CHANNEL],
    },
    EndpointSpec {
        tool: "slack_pins_add",
        endpoint: "pins.add",
        description: "Pin a message to a channel.",
        category: CATEGORY,
        read_only: false,
        user_token_only: false,
        params: &[CHANNEL, TIMESTAMP],
    },
    EndpointSpec {
        tool: "slack_pins_remove",
        endpoint: "pins.remove",
        description: "Unpin a message from a channel.",
        category: CATEGORY,
        read_only: false,
        user_token_only: false,
        params: &[CHANNEL, TIMESTAMP],
    },
    EndpointSpec {
        tool: "slack_reminders_list",
        endpoint: "reminders.list",
        description: "List reminders for the current user.",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[],
    },
    EndpointSpec {
        tool: "slack_reminders_add",
        endpoint: "reminders.add",
        description: "Create a reminder. Time can be Unix timestamp or natural language like 'in 20 minutes' or 'tomorrow at 9am'.",
        category: CATEGORY,
        read_only: false,
        user_token_only: false,
        params: &[
            ParamSpec::string("text", "Reminder text").required(),
            ParamSpec::string("time", "When to remind").required(),
            ParamSpec::string("user", "User to remind (defaults to yourself)"),
        ],
    },
    EndpointSpec {
        tool: "slack_reminders_delete",
        endpoint: "reminders.delete",
        description: "Delete a reminder.",
        category: CATEGORY,
        read_only: false,
        user_token_only: false,
        params: &[ParamSpec::string("reminder", "Reminder ID").required()],
    },
    EndpointSpec {
        tool: "slack_files_list",
        endpoint: "files.list",
        description: "List files shared in the workspace. Can filter by channel, user, or type.",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[
            ParamSpec::string("channel", "Only files in this conversation"),
            ParamSpec::string("user", "Only files created by this user"),
            ParamSpec::string("types", "Comma-separated file types (e.g. 'images,pdfs')"),
            ParamSpec::integer("count", "Files per page").default_int(20),
            ParamSpec::integer("page", "Page number").default_int(1),
        ],
    },
    EndpointSpec {
        tool: "slack_files_info",
        endpoint: "files.info",
        description: "Get information about a file.",
        category: CATEGORY,
        read_only: true,
        user_token_only: false,
        params: &[ParamSpec::string("file", "File ID").required()],
    },
];

/// Get all workspace tools.
pub fn workspace_tools(client: &Arc<SlackClient>) -> Vec<Arc<dyn Tool>> {
    endpoint_tools(&WORKSPACE_ENDPOINTS, client)
}
