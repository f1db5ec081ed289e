//! Named credential sources
//!
//! The access token is looked up under an ordered list of variable names,
//! first non-empty value wins. The same names are the keys recognized in the
//! persisted env file: the first one is canonical, the others are legacy
//! aliases that get collapsed into it on the next write.

use std::collections::HashMap;
use std::sync::Arc;

/// Canonical access token variable.
pub const SLACK_TOKEN: &str = "SLACK_TOKEN";
/// Legacy alias for bot tokens.
pub const SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";
/// Legacy alias for user tokens.
pub const SLACK_USER_TOKEN: &str = "SLACK_USER_TOKEN";
/// Refresh token variable.
pub const SLACK_REFRESH_TOKEN: &str = "SLACK_REFRESH_TOKEN";

/// Variable names under which credentials are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialKeys {
    /// Access token names in lookup order; the first is canonical.
    pub access: Vec<String>,

    /// Refresh token name.
    pub refresh: String,
}

impl Default for CredentialKeys {
    fn default() -> Self {
        Self {
            access: vec![
                SLACK_TOKEN.to_string(),
                SLACK_BOT_TOKEN.to_string(),
                SLACK_USER_TOKEN.to_string(),
            ],
            refresh: SLACK_REFRESH_TOKEN.to_string(),
        }
    }
}

impl CredentialKeys {
    /// The key written back when persisting an access token.
    pub fn canonical_access(&self) -> &str {
        self.access.first().map(String::as_str).unwrap_or(SLACK_TOKEN)
    }

    /// Whether `key` names the access token (canonical or alias).
    pub fn is_access_key(&self, key: &str) -> bool {
        self.access.iter().any(|k| k == key)
    }

    /// Comma-separated list of access token names, for error messages.
    pub fn describe_access(&self) -> String {
        self.access.join(", ")
    }
}

/// Something that can be asked for a variable by name.
pub trait VarSource: Send + Sync {
    /// Look up a variable. `None` when unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl VarSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Where the credential store reads its seed values from.
///
/// Layers are consulted in order. The first layer holding a non-empty
/// access token supplies both halves of the pair, so an access token from
/// one layer is never matched with a refresh token from another.
#[derive(Clone)]
pub struct CredentialSources {
    keys: CredentialKeys,
    layers: Vec<Arc<dyn VarSource>>,
}

impl CredentialSources {
    /// Create sources with explicit keys and a single reader.
    pub fn new(keys: CredentialKeys, reader: Arc<dyn VarSource>) -> Self {
        Self::layered(keys, vec![reader])
    }

    /// Create sources from readers in priority order.
    pub fn layered(keys: CredentialKeys, layers: Vec<Arc<dyn VarSource>>) -> Self {
        Self { keys, layers }
    }

    /// Default Slack variable names, read from the process environment.
    pub fn from_env() -> Self {
        Self::new(CredentialKeys::default(), Arc::new(ProcessEnv))
    }

    /// Default Slack variable names, read from a fixed map.
    pub fn from_map(vars: HashMap<String, String>) -> Self {
        Self::new(CredentialKeys::default(), Arc::new(vars))
    }

    /// Variable names in use.
    pub fn keys(&self) -> &CredentialKeys {
        &self.keys
    }

    fn access_in(&self, layer: &dyn VarSource) -> Option<String> {
        self.keys
            .access
            .iter()
            .filter_map(|name| layer.var(name))
            .find(|value| !value.is_empty())
    }

    /// Access and refresh token from the first layer with an access token.
    ///
    /// The refresh token is empty when that layer does not set one.
    pub fn pair(&self) -> Option<(String, String)> {
        self.layers.iter().find_map(|layer| {
            let access = self.access_in(layer.as_ref())?;
            let refresh = layer
                .var(&self.keys.refresh)
                .filter(|value| !value.is_empty())
                .unwrap_or_default();
            Some((access, refresh))
        })
    }

    /// First non-empty access token across the ordered names.
    pub fn access_token(&self) -> Option<String> {
        self.pair().map(|(access, _)| access)
    }

    /// Refresh token paired with [`access_token`](Self::access_token), if
    /// set and non-empty.
    pub fn refresh_token(&self) -> Option<String> {
        self.pair()
            .map(|(_, refresh)| refresh)
            .filter(|value| !value.is_empty())
    }
}

impl std::fmt::Debug for CredentialSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSources")
            .field("keys", &self.keys)
            .field("layers", &self.layers.len())
            .finish()
    }
}
