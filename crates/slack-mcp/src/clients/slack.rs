//! Slack Web API client.
//!
//! Every Slack tool goes through [`SlackClient::dispatch`]. It attaches the
//! current access token, and when Slack answers `token_expired` it rotates
//! the credential and repeats the call once. Payloads are returned exactly as
//! Slack sent them; `ok: false` responses other than expiry are not errors
//! here.

use super::config::{api_url, SlackConfig};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{Map, Value};
use slack_auth::{AuthError, CredentialKind, CredentialRotator, CredentialStore, ROTATE_ENDPOINT};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Error code Slack uses for an expired rotatable token.
pub const TOKEN_EXPIRED: &str = "token_expired";

/// Slack client errors.
#[derive(Debug, Error)]
pub enum SlackError {
    /// No usable access token.
    #[error(transparent)]
    Credential(#[from] AuthError),

    /// HTTP request failed or timed out.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Response body was not JSON.
    #[error("Invalid API response ({status}): {message}")]
    InvalidResponse {
        /// HTTP status code.
        status: u16,
        /// Start of the body.
        message: String,
    },
}

impl SlackError {
    /// Whether the call failed because no access token is configured.
    pub fn is_credential_missing(&self) -> bool {
        matches!(self, SlackError::Credential(AuthError::CredentialMissing(_)))
    }
}

/// HTTP verb of a Web API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    /// Params go in the query string.
    Get,
    /// Params go in a JSON body.
    Post,
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpVerb::Get => f.write_str("GET"),
            HttpVerb::Post => f.write_str("POST"),
        }
    }
}

/// State of one logical call.
#[derive(Debug)]
struct DispatchAttempt<'a> {
    verb: HttpVerb,
    endpoint: &'a str,
    params: Option<&'a Map<String, Value>>,
    retry_allowed: bool,
}

/// Whether a payload is Slack's expiry signal.
pub fn is_token_expired(data: &Value) -> bool {
    let ok = data.get("ok").and_then(Value::as_bool).unwrap_or(false);
    !ok && data.get("error").and_then(Value::as_str) == Some(TOKEN_EXPIRED)
}

/// Slack Web API client with automatic token rotation.
#[derive(Clone)]
pub struct SlackClient {
    /// HTTP client instance.
    client: Client,

    /// Web API base URL.
    api_base: String,

    /// Credential store.
    store: Arc<CredentialStore>,

    /// Credential rotator sharing the same store.
    rotator: Arc<CredentialRotator>,
}

impl SlackClient {
    /// Create a client from its parts.
    pub fn new(
        client: Client,
        api_base: impl Into<String>,
        store: Arc<CredentialStore>,
        rotator: Arc<CredentialRotator>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            store,
            rotator,
        }
    }

    /// Build the client, store and rotator described by a configuration.
    pub fn from_config(config: &SlackConfig) -> Result<Self, SlackError> {
        let store = Arc::new(CredentialStore::new(
            config.credential_sources()?,
            config.env_file(),
        ));
        let client = Client::builder().timeout(config.timeout()).build()?;
        let rotator = Arc::new(CredentialRotator::new(
            store.clone(),
            client.clone(),
            config.url(ROTATE_ENDPOINT),
        ));
        Ok(Self::new(client, config.api_base.clone(), store, rotator))
    }

    /// Credential rotator.
    pub fn rotator(&self) -> &Arc<CredentialRotator> {
        &self.rotator
    }

    /// Whether the current token is a user token (needed by `search.messages`).
    pub fn is_user_scoped(&self) -> bool {
        self.store.is_user_scoped()
    }

    /// Kind of the current token.
    pub fn credential_kind(&self) -> CredentialKind {
        self.store.kind()
    }

    /// POST a Web API method with a JSON body.
    pub async fn post(
        &self,
        endpoint: &str,
        params: Option<Map<String, Value>>,
    ) -> Result<Value, SlackError> {
        self.dispatch(HttpVerb::Post, endpoint, params).await
    }

    /// GET a Web API method with query parameters.
    pub async fn get(
        &self,
        endpoint: &str,
        params: Option<Map<String, Value>>,
    ) -> Result<Value, SlackError> {
        self.dispatch(HttpVerb::Get, endpoint, params).await
    }

    /// Call a Web API method.
    ///
    /// At most two round trips: the first attempt, and one retry after a
    /// successful rotation if the first attempt reported `token_expired`.
    /// When rotation fails the expiry payload itself is returned.
    ///
    /// Errors: a missing access token, a transport failure (including
    /// timeouts, which are never retried), or a body that is not JSON.
    #[instrument(skip(self, params), fields(verb = %verb, endpoint = %endpoint))]
    pub async fn dispatch(
        &self,
        verb: HttpVerb,
        endpoint: &str,
        params: Option<Map<String, Value>>,
    ) -> Result<Value, SlackError> {
        let mut attempt = DispatchAttempt {
            verb,
            endpoint,
            params: params.as_ref(),
            retry_allowed: true,
        };

        loop {
            let token = self.store.get()?;
            let data = self.send(&attempt, &token).await?;

            if !attempt.retry_allowed || !is_token_expired(&data) {
                return Ok(data);
            }

            attempt.retry_allowed = false;
            warn!("Access token expired, attempting rotation");

            if !self.rotator.refresh_after(&token).await {
                return Ok(data);
            }
            debug!("Retrying with rotated token");
        }
    }

    /// One round trip.
    async fn send(&self, attempt: &DispatchAttempt<'_>, token: &str) -> Result<Value, SlackError> {
        let url = api_url(&self.api_base, attempt.endpoint);
        let request = match attempt.verb {
            HttpVerb::Post => {
                let empty = Map::new();
                self.client
                    .post(&url)
                    .header(CONTENT_TYPE, "application/json; charset=utf-8")
                    .json(attempt.params.unwrap_or(&empty))
            }
            HttpVerb::Get => self
                .client
                .get(&url)
                .query(&query_pairs(attempt.params)),
        };

        let response = request
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Decode a response body as JSON, whatever the HTTP status.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value, SlackError> {
        let status = response.status();
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|_| {
            warn!("Slack API returned non-JSON body ({})", status.as_u16());
            SlackError::InvalidResponse {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            }
        })
    }
}

impl fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_base", &self.api_base)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// Flatten params into query pairs. Strings go as-is, everything else as JSON.
fn query_pairs(params: Option<&Map<String, Value>>) -> Vec<(String, String)> {
    params
        .into_iter()
        .flatten()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_token_expired() {
        assert!(is_token_expired(&json!({"ok": false, "error": "token_expired"})));
        assert!(is_token_expired(&json!({"error": "token_expired"})));
        assert!(!is_token_expired(&json!({"ok": false, "error": "channel_not_found"})));
        assert!(!is_token_expired(&json!({"ok": true, "error": "token_expired"})));
        assert!(!is_token_expired(&json!({"ok": true})));
    }

    #[test]
    fn test_query_pairs() {
        let params = json!({"channel": "C1", "limit": 100, "inclusive": true});
        let mut pairs = query_pairs(params.as_object());
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("channel".to_string(), "C1".to_string()),
                ("inclusive".to_string(), "true".to_string()),
                ("limit".to_string(), "100".to_string()),
            ]
        );
        assert!(query_pairs(None).is_empty());
    }

    #[test]
    fn test_verb_display() {
        assert_eq!(HttpVerb::Get.to_string(), "GET");
        assert_eq!(HttpVerb::Post.to_string(), "POST");
    }
}
