use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Bearer credential shared by every collaborator call.
///
/// Constructed once at startup and handed to whatever needs it; clones share
/// the same underlying slot.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    credential: Arc<RwLock<Option<Credential>>>,
}

impl SessionContext {
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            credential: Arc::new(RwLock::new(credential)),
        }
    }

    pub async fn bearer_token(&self) -> Option<String> {
        self.credential
            .read()
            .await
            .as_ref()
            .map(|credential| credential.token.clone())
    }

    pub async fn credential(&self) -> Option<Credential> {
        self.credential.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.credential.read().await.is_some()
    }

    pub async fn establish(&self, credential: Credential) {
        *self.credential.write().await = Some(credential);
    }

    pub async fn clear(&self) {
        *self.credential.write().await = None;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSession {
    pub credential: Option<Credential>,
    /// Cards viewed across every deck session, shown on the dashboard.
    pub viewed_total: u64,
}

/// JSON file holding the credential and cumulative stats between runs.
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

    pub fn load(&self) -> Result<PersistedSession> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted session");
                return Ok(PersistedSession::default());
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read session file '{}'", self.path.display())
                })
            }
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("session file '{}' is malformed", self.path.display()))
    }

    pub fn save(&self, session: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create session directory '{}'", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write session file '{}'", self.path.display()))
    }

    pub fn store_credential(&self, credential: Credential) -> Result<()> {
        let mut session = self.load().unwrap_or_default();
        info!(email = credential.email.as_deref().unwrap_or("-"), "storing credential");
        session.credential = Some(credential);
        self.save(&session)
    }

    /// Forgets the credential but keeps cumulative stats.
    pub fn clear_credential(&self) -> Result<()> {
        let mut session = self.load().unwrap_or_default();
        if session.credential.take().is_some() {
            info!("cleared stored credential");
        }
        self.save(&session)
    }

    pub fn add_viewed(&self, viewed: u64) -> Result<u64> {
        let mut session = self.load().unwrap_or_default();
        session.viewed_total = session.viewed_total.saturating_add(viewed);
        self.save(&session)?;
        Ok(session.viewed_total)
    }
}

pub fn default_session_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|base| base.join("jobswipe"))
        .unwrap_or_else(|| PathBuf::from(".jobswipe"))
        .join("session.json")
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
