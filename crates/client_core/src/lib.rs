use std::sync::Arc;

use anyhow::{Context, Result};
use shared::protocol::{JobPosting, TokenResponse};
use tokio::runtime::Handle;
use tracing::{info, warn};

pub mod board;
pub mod card;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod deck;
pub mod dispatch;
pub mod error;
pub mod feed;
pub mod gesture;
pub mod notify;
pub mod profile;
pub mod session;

use board::{HttpJobBoard, JobBoard};
use config::{normalize_api_url, ClientSettings};
use deck::CardQueue;
use notify::{DecisionNotifier, SpawnedDecisionNotifier};
use session::{PersistedSession, SessionContext, SessionStore};

/// Everything a front-end needs, built once from settings at startup.
pub struct JobSwipeClient {
    settings: ClientSettings,
    store: SessionStore,
    session: SessionContext,
    board: Arc<dyn JobBoard>,
}

impl JobSwipeClient {
    pub fn from_settings(mut settings: ClientSettings) -> Result<Self> {
        settings.api_url = normalize_api_url(&settings.api_url)?;
        let store = SessionStore::new(settings.session_file.clone());
        let persisted = store.load().unwrap_or_else(|err| {
            warn!("starting signed out: {err:#}");
            PersistedSession::default()
        });
        let session = SessionContext::new(persisted.credential);
        let board = HttpJobBoard::new(
            settings.api_url.clone(),
            settings.request_timeout(),
            session.clone(),
        )
        .context("failed to build http client")?;
        info!(api_url = %settings.api_url, "job board client ready");
        Ok(Self::with_board(settings, store, session, Arc::new(board)))
    }

    pub fn with_board(
        settings: ClientSettings,
        store: SessionStore,
        session: SessionContext,
        board: Arc<dyn JobBoard>,
    ) -> Self {
        Self {
            settings,
            store,
            session,
            board,
        }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn board(&self) -> Arc<dyn JobBoard> {
        Arc::clone(&self.board)
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let token = self
            .board
            .login(email, password)
            .await
            .context("login failed")?;
        self.persist_credential().await?;
        info!(email, "signed in");
        Ok(token)
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<TokenResponse> {
        let token = self
            .board
            .register(email, password, name)
            .await
            .context("registration failed")?;
        self.persist_credential().await?;
        info!(email, "registered");
        Ok(token)
    }

    pub async fn logout(&self) -> Result<()> {
        self.session.clear().await;
        self.store.clear_credential()
    }

    /// Forgets a credential the board rejected.
    pub async fn drop_rejected_session(&self) {
        if let Err(err) = self.logout().await {
            warn!("failed to clear rejected session: {err:#}");
        }
    }

    pub fn decision_notifier(&self, runtime: Handle) -> Arc<SpawnedDecisionNotifier> {
        Arc::new(SpawnedDecisionNotifier::new(self.board(), runtime))
    }

    pub fn new_deck(&self, notifier: Arc<dyn DecisionNotifier>) -> CardQueue<JobPosting> {
        CardQueue::new(notifier)
            .with_window_size(self.settings.window_size)
            .with_gesture_config(self.settings.gesture)
    }

    pub fn viewed_total(&self) -> u64 {
        self.store
            .load()
            .map(|session| session.viewed_total)
            .unwrap_or_default()
    }

    pub fn record_viewed(&self, viewed: u64) -> Result<u64> {
        if viewed == 0 {
            return Ok(self.viewed_total());
        }
        self.store.add_viewed(viewed)
    }

    async fn persist_credential(&self) -> Result<()> {
        if let Some(credential) = self.session.credential().await {
            self.store
                .store_credential(credential)
                .context("failed to persist session")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
