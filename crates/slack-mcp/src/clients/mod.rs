//! Slack Web API client.
//!
//! - `config`: API base URL, credential env file and timeouts
//! - `slack`: the authenticated dispatcher that every tool calls through
//!
//! The client attaches the current access token to each call and rotates it
//! once when Slack reports `token_expired`.

pub mod config;
pub mod slack;

pub use config::{ConfigError, SlackConfig};
pub use slack::{HttpVerb, SlackClient, SlackError};
