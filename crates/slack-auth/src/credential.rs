//! Credential pair and token classification
//!
//! Slack encodes the kind of a token in its prefix. Classification is a pure
//! function of the token string and is recomputed whenever it is needed,
//! because the stored token changes underneath on every rotation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access/refresh token pair.
///
/// An empty string means "unset". A pair is either fully empty or carries a
/// non-empty access token; the refresh token may be empty on its own
/// (rotation unsupported).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Bearer value sent on every API call
    pub access_token: String,

    /// Single-use value exchanged for a new pair
    pub refresh_token: String,
}

impl CredentialPair {
    /// Create a new pair.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// A pair without a refresh token.
    pub fn access_only(access_token: impl Into<String>) -> Self {
        Self::new(access_token, String::new())
    }

    /// True when no access token is set.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty()
    }

    /// Classify the access token.
    pub fn kind(&self) -> CredentialKind {
        CredentialKind::of(&self.access_token)
    }
}

// Tokens never show up in logs or panics.
impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &mask_token(&self.access_token))
            .field("refresh_token", &mask_token(&self.refresh_token))
            .finish()
    }
}

/// Kind of Slack token, derived from its prefix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// Bot token (`xoxb-`)
    Bot,
    /// User token (`xoxp-`)
    User,
    /// Rotatable user token (`xoxe.xoxp-`)
    UserRotatable,
    /// Rotatable bot token (`xoxe.xoxb-`)
    BotRotatable,
    /// App-level token (`xapp-`)
    AppLevel,
    /// Anything else, including the empty string
    Unknown,
}

/// Prefix table, longest prefixes first so that `xoxe.xoxp-` is never
/// mistaken for a plain user token.
const PREFIXES: &[(&str, CredentialKind)] = &[
    ("xoxe.xoxp-", CredentialKind::UserRotatable),
    ("xoxe.xoxb-", CredentialKind::BotRotatable),
    ("xoxb-", CredentialKind::Bot),
    ("xoxp-", CredentialKind::User),
    ("xapp-", CredentialKind::AppLevel),
];

impl CredentialKind {
    /// Classify a token by prefix.
    pub fn of(token: &str) -> Self {
        PREFIXES
            .iter()
            .find(|(prefix, _)| token.starts_with(prefix))
            .map(|(_, kind)| *kind)
            .unwrap_or(CredentialKind::Unknown)
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKind::Bot => "bot",
            CredentialKind::User => "user",
            CredentialKind::UserRotatable => "user_rotatable",
            CredentialKind::BotRotatable => "bot_rotatable",
            CredentialKind::AppLevel => "app_level",
            CredentialKind::Unknown => "unknown",
        }
    }

    /// User-scoped tokens can call user-only APIs such as `search.messages`.
    pub fn is_user_scoped(&self) -> bool {
        matches!(self, CredentialKind::User | CredentialKind::UserRotatable)
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a token by prefix.
pub fn classify(token: &str) -> CredentialKind {
    CredentialKind::of(token)
}

/// Shorten a token for logging: keeps the kind prefix, hides the secret.
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return "<empty>".to_string();
    }
    let visible: String = token.chars().take(10).collect();
    if visible.len() == token.len() {
        "***".to_string()
    } else {
        format!("{}***", visible)
    }
}
