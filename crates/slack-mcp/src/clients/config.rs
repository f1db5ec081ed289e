//! Slack client configuration.
//!
//! Provides configuration for the Slack Web API endpoint, the env file used
//! to persist rotated credentials, and timeout settings. Configuration is
//! loaded from environment variables with defaults for the public Slack API.

use serde::{Deserialize, Serialize};
use slack_auth::{AuthResult, CredentialKeys, CredentialSources, EnvFile, ProcessEnv, VarSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default Slack Web API base URL.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Slack client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Base URL of the Web API (e.g., "https://slack.com/api").
    pub api_base: String,

    /// Env file holding persisted credentials. `None` disables persistence.
    pub env_file: Option<PathBuf>,

    /// Per round trip timeout in seconds.
    pub default_timeout_secs: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_base: SLACK_API_BASE.to_string(),
            env_file: Some(PathBuf::from(".env")),
            default_timeout_secs: 30,
        }
    }
}

impl SlackConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SLACK_API_BASE`: Web API base URL (default: https://slack.com/api)
    /// - `SLACK_ENV_FILE`: Credential env file (default: .env, empty disables)
    /// - `SLACK_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            api_base: std::env::var("SLACK_API_BASE").unwrap_or(default.api_base),
            env_file: match std::env::var("SLACK_ENV_FILE") {
                Ok(path) if path.is_empty() => None,
                Ok(path) => Some(PathBuf::from(path)),
                Err(_) => default.env_file,
            },
            default_timeout_secs: std::env::var("SLACK_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.default_timeout_secs),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    /// Build a full URL for an API method.
    pub fn url(&self, endpoint: &str) -> String {
        api_url(&self.api_base, endpoint)
    }

    /// The env file as a persistence target.
    pub fn env_file(&self) -> Option<EnvFile> {
        self.env_file.as_ref().map(EnvFile::new)
    }

    /// Credential sources for the store.
    ///
    /// The process environment wins; the env file is the fallback. Both
    /// tokens come from whichever of the two holds an access token.
    pub fn credential_sources(&self) -> AuthResult<CredentialSources> {
        self.credential_sources_over(Arc::new(ProcessEnv))
    }

    /// Credential sources with `primary` in place of the process environment.
    pub fn credential_sources_over(
        &self,
        primary: Arc<dyn VarSource>,
    ) -> AuthResult<CredentialSources> {
        let mut layers = vec![primary];
        if let Some(env_file) = self.env_file() {
            layers.push(Arc::new(env_file.read_vars()?));
        }
        Ok(CredentialSources::layered(CredentialKeys::default(), layers))
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "SLACK_API_BASE".to_string(),
                message: format!("expected an http(s) URL, got {:?}", self.api_base),
            });
        }
        if self.default_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SLACK_TIMEOUT_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Join a base URL and an API method name.
pub fn api_url(base: &str, endpoint: &str) -> String {
    let base = base.trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", base, endpoint)
}
