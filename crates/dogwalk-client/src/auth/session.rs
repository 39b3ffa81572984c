//! Session persistence.
//!
//! The signed-in session lives in `~/.dogwalk/session.json` between CLI runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use dogwalk_core::{Error, Result};

/// Refresh this long before the bearer token actually expires.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// A signed-in user and the bearer token that proves it.
///
/// Hosted sign-in also keeps the tokens needed to renew and revoke the
/// session; local sessions leave them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Unix seconds after which `token` is no longer accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl Session {
    /// Whether the token is about to expire and can be renewed.
    pub fn needs_refresh(&self, now: i64) -> bool {
        self.refresh_token.is_some()
            && self
                .expires_at
                .is_some_and(|at| now + REFRESH_MARGIN_SECS >= at)
    }
}

/// Current time in Unix seconds.
pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

/// On-disk session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location, `~/.dogwalk/session.json`.
    pub fn open_default() -> Result<Self> {
        Self::default_path()
            .map(Self::new)
            .ok_or_else(|| Error::Config("Cannot determine home directory".into()))
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".dogwalk").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved session. A missing or unreadable file means no session.
    pub fn load(&self) -> Option<Session> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
