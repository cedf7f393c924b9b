use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Credential file name in cache directory
const CREDENTIAL_FILE: &str = "session-cookie.json";

/// Lifetime of the server's session cookie in seconds.
/// The server issues `lunchmore-session` with a two hour max age.
const COOKIE_MAX_AGE_SECS: i64 = 7200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Cookie header for the API origin, `name=value` pairs joined by `; `
    pub cookie: String,
    pub saved_at: DateTime<Utc>,
}

impl StoredCredential {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            saved_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.saved_at + Duration::seconds(COOKIE_MAX_AGE_SECS)
    }
}

/// Durable copy of the server session cookie.
///
/// This is what lets a later process recover the session with a refresh.
/// The bearer token is never written here.
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(CREDENTIAL_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved cookie header, ignoring an expired one
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read credential file")?;
        let stored: StoredCredential =
            serde_json::from_str(&contents).context("Failed to parse credential file")?;

        if stored.is_expired() {
            debug!(saved_at = %stored.saved_at, "Saved session cookie expired");
            return Ok(None);
        }
        Ok(Some(stored.cookie))
    }

    pub fn save(&self, cookie: &str) -> Result<()> {
        self.write(&StoredCredential::new(cookie))
    }

    fn write(&self, stored: &StoredCredential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(stored)?;
        std::fs::write(&self.path, contents).context("Failed to write credential file")?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove credential file")?;
        }
        Ok(())
    }
}
