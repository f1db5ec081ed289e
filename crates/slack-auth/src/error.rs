//! Error types for credential operations
//!
//! This module defines the error types that can occur while resolving,
//! rotating, and persisting Slack credentials.

use thiserror::Error;

/// Credential error types.
///
/// `CredentialMissing` is the only error surfaced by the credential store
/// itself. The remaining variants describe why a rotation attempt failed;
/// they are logged by the rotator and never escape `refresh()`.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No access credential is configured, even after a reload
    #[error("Slack token not found. Set one of: {0}")]
    CredentialMissing(String),

    /// Rotation requested but there is no refresh credential
    #[error("No refresh token available")]
    NoRefreshCredential,

    /// Rotation request could not be completed
    #[error("Token rotation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Rotation endpoint returned something that is not a rotation response
    #[error("Malformed rotation response: {0}")]
    MalformedResponse(String),

    /// Platform refused the rotation (`ok: false`)
    #[error("Token refresh failed: {0}")]
    RotationRejected(String),

    /// Platform reported success but returned no access token
    #[error("Token rotation returned an empty access token")]
    EmptyCredential,

    /// Env file could not be read or written
    #[error("Env file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for credential operations.
pub type AuthResult<T> = Result<T, AuthError>;
