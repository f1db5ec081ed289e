//! In-memory credential store
//!
//! The store owns the one credential pair of the process. It is shared by
//! `Arc` between the dispatcher and the rotator; nothing reaches it through
//! globals.

use crate::credential::{CredentialKind, CredentialPair};
use crate::env_file::EnvFile;
use crate::error::{AuthError, AuthResult};
use crate::sources::CredentialSources;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Holds the current access/refresh pair.
///
/// Reads are concurrent. A pair is always replaced as a whole under the write
/// lock, so readers never see a new access token next to an old refresh token.
/// Writes to the env file are serialized separately so the file is updated in
/// the same order as memory.
pub struct CredentialStore {
    /// Current pair
    pair: RwLock<CredentialPair>,

    /// Named sources used for the initial load and for reloads
    sources: CredentialSources,

    /// Persistence target for rotated pairs
    env_file: Option<EnvFile>,

    /// Serializes `persist`
    write_lock: Mutex<()>,
}

impl CredentialStore {
    /// Create a store seeded from the given sources.
    pub fn new(sources: CredentialSources, env_file: Option<EnvFile>) -> Self {
        let pair = Self::load(&sources).unwrap_or_default();
        Self::with_pair(pair, sources, env_file)
    }

    /// Create a store with an explicit starting pair.
    pub fn with_pair(
        pair: CredentialPair,
        sources: CredentialSources,
        env_file: Option<EnvFile>,
    ) -> Self {
        debug!(kind = %pair.kind(), "Credential store initialized");
        Self {
            pair: RwLock::new(pair),
            sources,
            env_file,
            write_lock: Mutex::new(()),
        }
    }

    fn load(sources: &CredentialSources) -> Option<CredentialPair> {
        let (access_token, refresh_token) = sources.pair()?;
        Some(CredentialPair::new(access_token, refresh_token))
    }

    fn read(&self) -> RwLockReadGuard<'_, CredentialPair> {
        self.pair.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CredentialPair> {
        self.pair.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the access token, reloading from the sources when unset.
    ///
    /// Fails with [`AuthError::CredentialMissing`] when no source provides one.
    pub fn get(&self) -> AuthResult<String> {
        let token = self.access_token();
        if !token.is_empty() {
            return Ok(token);
        }

        self.reload_from_sources();
        let token = self.access_token();
        if token.is_empty() {
            return Err(AuthError::CredentialMissing(
                self.sources.keys().describe_access(),
            ));
        }
        Ok(token)
    }

    /// Re-read the sources. Keeps the current pair when every source is
    /// empty. Returns whether a pair was loaded.
    pub fn reload_from_sources(&self) -> bool {
        match Self::load(&self.sources) {
            Some(pair) => {
                debug!(kind = %pair.kind(), "Credentials reloaded from sources");
                *self.write() = pair;
                true
            }
            None => {
                debug!("No credential found in sources, keeping last known value");
                false
            }
        }
    }

    /// Current access token without reloading; empty when unset.
    pub fn access_token(&self) -> String {
        self.read().access_token.clone()
    }

    /// Current refresh token; empty when rotation is unsupported.
    pub fn refresh_token(&self) -> String {
        self.read().refresh_token.clone()
    }

    /// Consistent copy of the pair.
    pub fn snapshot(&self) -> CredentialPair {
        self.read().clone()
    }

    /// Kind of the current access token; `Unknown` when missing.
    pub fn kind(&self) -> CredentialKind {
        self.get()
            .map(|token| CredentialKind::of(&token))
            .unwrap_or(CredentialKind::Unknown)
    }

    /// Whether the current token may call user-only APIs.
    ///
    /// Advisory: callers gate user-only operations on it, the dispatcher does
    /// not.
    pub fn is_user_scoped(&self) -> bool {
        self.kind().is_user_scoped()
    }

    /// Replace the pair and write it to the env file.
    ///
    /// The in-memory update always takes effect. The file write is best
    /// effort: a missing file is skipped and I/O errors are logged. Returns
    /// whether the file was written.
    pub async fn persist(&self, pair: CredentialPair) -> bool {
        let _guard = self.write_lock.lock().await;
        *self.write() = pair.clone();

        let Some(env_file) = &self.env_file else {
            return false;
        };

        match env_file.write_credentials(self.sources.keys(), &pair).await {
            Ok(written) => {
                if written {
                    info!(path = %env_file.path().display(), "Rotated credentials saved");
                }
                written
            }
            Err(e) => {
                warn!(
                    path = %env_file.path().display(),
                    error = %e,
                    "Failed to save rotated credentials"
                );
                false
            }
        }
    }

    /// The env file rotated credentials are written to.
    pub fn env_file(&self) -> Option<&EnvFile> {
        self.env_file.as_ref()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("pair", &*self.read())
            .field("sources", &self.sources)
            .field("env_file", &self.env_file)
            .finish()
    }
}
