//! Token rotation
//!
//! Rotatable Slack tokens (`xoxe.*`) expire after twelve hours. The rotator
//! exchanges the single-use refresh token for a new pair through
//! `tooling.tokens.rotate` and hands the result to the store.
//!
//! Rotations are serialized. A caller that had to wait for another rotation
//! reuses its outcome instead of spending the refresh token a second time:
//!
//! - the access token moved on while waiting: the other caller succeeded;
//! - an attempt finished while waiting and the token did not move: the other
//!   caller failed, and so does this one.

use crate::credential::{mask_token, CredentialPair};
use crate::error::{AuthError, AuthResult};
use crate::store::CredentialStore;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Slack's token rotation endpoint.
pub const ROTATE_ENDPOINT: &str = "tooling.tokens.rotate";

/// Bumps the attempt counter when dropped.
struct AttemptGuard<'a>(&'a AtomicU64);

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Body of a `tooling.tokens.rotate` response.
#[derive(Debug, Deserialize)]
struct RotationResponse {
    #[serde(default)]
    ok: bool,

    #[serde(default)]
    token: Option<String>,

    #[serde(default)]
    refresh_token: Option<String>,

    #[serde(default)]
    error: Option<String>,
}

/// Exchanges refresh tokens for new credential pairs.
pub struct CredentialRotator {
    /// Store read from and written to
    store: Arc<CredentialStore>,

    /// HTTP client instance
    client: reqwest::Client,

    /// Full URL of the rotation endpoint
    rotate_url: String,

    /// Held for the duration of a rotation
    rotation_lock: Mutex<()>,

    /// Completed rotation attempts
    attempts: AtomicU64,
}

impl CredentialRotator {
    /// Create a rotator using an existing HTTP client.
    pub fn new(
        store: Arc<CredentialStore>,
        client: reqwest::Client,
        rotate_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            client,
            rotate_url: rotate_url.into(),
            rotation_lock: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Create a rotator with its own client and per-request timeout.
    pub fn with_timeout(
        store: Arc<CredentialStore>,
        rotate_url: impl Into<String>,
        timeout: Duration,
    ) -> AuthResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(store, client, rotate_url))
    }

    /// The store this rotator writes to.
    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Number of rotation attempts made so far (including ones that failed
    /// before reaching the network).
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Rotate the current credential.
    ///
    /// Returns `true` when the store now holds a fresh pair. Failures are
    /// logged, never returned.
    pub async fn refresh(&self) -> bool {
        let current = self.store.access_token();
        self.refresh_after(&current).await
    }

    /// Rotate a credential that was observed to be expired.
    ///
    /// `stale_access` is the access token the caller used when it saw the
    /// expiry. If someone else already replaced it, no request is made.
    pub async fn refresh_after(&self, stale_access: &str) -> bool {
        let seen_attempts = self.attempts.load(Ordering::SeqCst);
        let _guard = self.rotation_lock.lock().await;

        let current = self.store.access_token();
        if !current.is_empty() && current != stale_access {
            debug!(
                token = %mask_token(&current),
                "Credential already rotated by a concurrent caller"
            );
            return true;
        }
        if self.attempts.load(Ordering::SeqCst) != seen_attempts {
            debug!("Concurrent rotation failed, reusing its result");
            return false;
        }

        // Counted even if this future is dropped mid-request: the refresh
        // token may already be spent. Dropped before the lock is released.
        let attempt = AttemptGuard(&self.attempts);
        let result = self.rotate().await;
        drop(attempt);

        match result {
            Ok(pair) => {
                info!(
                    kind = %pair.kind(),
                    token = %mask_token(&pair.access_token),
                    "Token refreshed successfully"
                );
                true
            }
            Err(AuthError::NoRefreshCredential) => {
                info!("No refresh token available");
                false
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                false
            }
        }
    }

    /// One exchange against the rotation endpoint.
    #[instrument(skip(self), fields(url = %self.rotate_url))]
    async fn rotate(&self) -> AuthResult<CredentialPair> {
        let refresh_token = self.store.refresh_token();
        if refresh_token.is_empty() {
            return Err(AuthError::NoRefreshCredential);
        }

        debug!("Requesting token rotation");
        let response = self
            .client
            .post(&self.rotate_url)
            .form(&[("refresh_token", refresh_token.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let data: RotationResponse = serde_json::from_str(&body).map_err(|e| {
            AuthError::MalformedResponse(format!("HTTP {}: {}", status.as_u16(), e))
        })?;

        if !data.ok {
            return Err(AuthError::RotationRejected(
                data.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let access_token = data.token.unwrap_or_default();
        if access_token.is_empty() {
            return Err(AuthError::EmptyCredential);
        }

        let pair = CredentialPair::new(access_token, data.refresh_token.unwrap_or_default());
        self.store.persist(pair.clone()).await;
        Ok(pair)
    }
}

impl std::fmt::Debug for CredentialRotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRotator")
            .field("rotate_url", &self.rotate_url)
            .field("attempts", &self.attempts())
            .finish_non_exhaustive()
    }
}
