//! # Slack Authentication
//!
//! This crate manages the lifecycle of the Slack credential used by the
//! slack-mcp gateway.
//!
//! ## Overview
//!
//! The slack-auth crate handles:
//! - **Credentials**: The access/refresh token pair and prefix-based
//!   token classification
//! - **Sources**: Seeding the pair from an ordered list of named variables
//! - **Store**: Lock-guarded in-memory state shared by the dispatcher and
//!   the rotator
//! - **Persistence**: Writing rotated pairs back to a sidecar `.env` file
//!   without disturbing unrelated entries
//! - **Rotation**: Exchanging a refresh token through
//!   `tooling.tokens.rotate`, at most once per expiry episode
//!
//! ## Supported Token Types
//!
//! | Prefix       | Kind             | Notes                                |
//! |--------------|------------------|--------------------------------------|
//! | `xoxb-`      | `bot`            | Bot token, no `search.messages`      |
//! | `xoxp-`      | `user`           | User token, all APIs                 |
//! | `xoxe.xoxp-` | `user_rotatable` | Expires in 12h, needs refresh token  |
//! | `xoxe.xoxb-` | `bot_rotatable`  | Expires in 12h, needs refresh token  |
//! | `xapp-`      | `app_level`      | App-level token                      |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use slack_auth::{CredentialRotator, CredentialSources, CredentialStore, EnvFile};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! async fn setup() -> Result<(), slack_auth::AuthError> {
//!     let store = Arc::new(CredentialStore::new(
//!         CredentialSources::from_env(),
//!         Some(EnvFile::new(".env")),
//!     ));
//!
//!     let rotator = CredentialRotator::with_timeout(
//!         store.clone(),
//!         "https://slack.com/api/tooling.tokens.rotate",
//!         Duration::from_secs(30),
//!     )?;
//!
//!     let token = store.get()?;
//!     println!("Using a {} token", slack_auth::classify(&token));
//!
//!     if rotator.refresh().await {
//!         println!("Rotated");
//!     }
//!     Ok(())
//! }
//! ```

pub mod credential;
pub mod env_file;
pub mod error;
pub mod rotator;
pub mod sources;
pub mod store;

// Re-export main types
pub use credential::{classify, mask_token, CredentialKind, CredentialPair};
pub use env_file::EnvFile;
pub use error::{AuthError, AuthResult};
pub use rotator::{CredentialRotator, ROTATE_ENDPOINT};
pub use sources::{CredentialKeys, CredentialSources, ProcessEnv, VarSource};
pub use store::CredentialStore;
