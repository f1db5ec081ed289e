//! Sidecar env file persistence
//!
//! Rotated credentials are written back to a flat `KEY=VALUE` file so the
//! next process start picks them up. The rewrite is a small structured merge:
//! lines are parsed once, credential keys are updated in place, and every
//! other line is written back exactly as it was read.

use crate::credential::CredentialPair;
use crate::error::AuthResult;
use crate::sources::CredentialKeys;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One line of an env file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EnvLine {
    /// Variable name, if the line assigns one.
    key: Option<String>,
    /// The line as read.
    raw: String,
}

/// Variable name assigned by `line`, read the way dotenv reads it:
/// surrounding whitespace and an `export` prefix are not part of the name.
fn line_key(line: &str) -> Option<String> {
    let line = line.trim_start();
    if line.starts_with('#') {
        return None;
    }
    let line = line
        .strip_prefix("export")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim_start)
        .unwrap_or(line);
    let (key, _) = line.split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then(|| key.to_string())
}

fn parse_lines(content: &str) -> Vec<EnvLine> {
    content
        .lines()
        .map(|line| EnvLine {
            key: line_key(line),
            raw: line.to_string(),
        })
        .collect()
}

/// Merge a credential pair into env file content.
///
/// - The first access key line (canonical or alias) becomes the canonical
///   key with the new token; later access key lines are dropped.
/// - Refresh key lines are rewritten in place.
/// - Missing keys are appended; the refresh key only when non-empty.
/// - All other lines are kept unchanged, in order.
pub fn merge_credentials(content: &str, keys: &CredentialKeys, pair: &CredentialPair) -> String {
    let canonical = keys.canonical_access();
    let mut output = Vec::new();
    let mut found_access = false;
    let mut found_refresh = false;

    for line in parse_lines(content) {
        match line.key.as_deref() {
            Some(key) if keys.is_access_key(key) => {
                if !found_access {
                    output.push(format!("{}={}", canonical, pair.access_token));
                    found_access = true;
                }
            }
            Some(key) if key == keys.refresh => {
                output.push(format!("{}={}", keys.refresh, pair.refresh_token));
                found_refresh = true;
            }
            _ => output.push(line.raw),
        }
    }

    if !found_access {
        output.push(format!("{}={}", canonical, pair.access_token));
    }
    if !found_refresh && !pair.refresh_token.is_empty() {
        output.push(format!("{}={}", keys.refresh, pair.refresh_token));
    }

    let mut merged = output.join("\n");
    merged.push('\n');
    merged
}

/// Parse env file content into a variable map with dotenv rules.
///
/// Lines dotenv cannot parse are skipped.
pub fn parse_vars(content: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for item in dotenvy::from_read_iter(content.as_bytes()) {
        match item {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(e) => warn!(error = %e, "Skipping unparseable env file line"),
        }
    }
    vars
}

/// A `KEY=VALUE` file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    /// Point at a file. Nothing is read until asked.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file as a variable map. A missing file reads as empty.
    pub fn read_vars(&self) -> AuthResult<HashMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(parse_vars(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a credential pair into the file.
    ///
    /// Returns `Ok(false)` without touching the disk when the file does not
    /// exist; the file is never created.
    pub async fn write_credentials(
        &self,
        keys: &CredentialKeys,
        pair: &CredentialPair,
    ) -> AuthResult<bool> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Env file not found, skipping write");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let merged = merge_credentials(&content, keys, pair);
        tokio::fs::write(&self.path, merged).await?;
        debug!(path = %self.path.display(), "Credentials written to env file");
        Ok(true)
    }
}
