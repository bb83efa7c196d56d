//! File-backed session store
//!
//! Keeps the serialized [`SessionState`] in a single JSON file so later runs
//! can skip the interactive login. Writes go to a sibling temporary file
//! that is then renamed over the target, so a reader never sees a
//! half-written document.

use crate::{Error, Result, platform::SessionRefreshHook, types::SessionState};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error};

/// Session persistence on local disk
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Path to the state file
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a saved session is present
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and decode the saved session
    pub async fn load(&self) -> Result<SessionState> {
        let content = fs::read_to_string(&self.path).await?;
        debug!("Loading session state from: {:?}", self.path);

        serde_json::from_str(&content)
            .map_err(|e| Error::corrupt_state(self.path.display().to_string(), e.to_string()))
    }

    /// Persist `state` without its volatile constants
    pub async fn save(&self, state: &SessionState) -> Result<()> {
        let mut persisted = state.without_constants();
        persisted.saved_at = Some(Utc::now());
        let content = serde_json::to_string(&persisted)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, content).await {
            error!("Failed to write session file {:?}: {}", temp_path, e);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            error!("Failed to replace session file {:?}: {}", self.path, e);
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!("Session state saved to: {:?}", self.path);
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl SessionRefreshHook for SessionStore {
    async fn on_session_refresh(&self, state: &SessionState) -> Result<()> {
        self.save(state).await
    }
}
