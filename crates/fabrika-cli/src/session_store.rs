//! # Session Store
//!
//! The logged-in session lives in a JSON file between invocations
//! (`.fabrika/session.json` by default). `login` writes it, `logout` and a
//! rejected token remove it.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fabrika_client::{Session, UserProfile};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default location of the session file, relative to the working directory.
pub const DEFAULT_SESSION_FILE: &str = ".fabrika/session.json";

#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
struct StoredSession {
    token: String,
    #[zeroize(skip)]
    user: UserProfile,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the session, replacing any stored one.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let stored = StoredSession {
            token: session.token().to_string(),
            user: session.user.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;

        let mut file = open_private(&self.path)
            .with_context(|| format!("failed to write session file {}", self.path.display()))?;
        file.write_all(json.as_bytes())?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// The stored session, or `None` when nobody is logged in.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read session file {}", self.path.display()))?;
        let stored: StoredSession = serde_json::from_str(&content)
            .with_context(|| format!("corrupt session file {}", self.path.display()))?;
        Ok(Some(Session::new(stored.token.as_str(), stored.user.clone())))
    }

    /// Remove the stored session. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove session file {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "session cleared");
        Ok(true)
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::File::create(path)
}
