//! The signed-in state shared by every command.
//!
//! Holds the current [`Session`], restores it from the [`SessionStore`] on
//! start, and is the [`TokenSource`] the API client draws bearer tokens from.
//! Tokens close to expiry are renewed through the provider before use.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::session::unix_now;
use super::{AuthError, AuthProvider, Session, SessionStore};
use crate::client::TokenSource;
use crate::error::ApiError;

pub struct AuthContext {
    provider: Arc<dyn AuthProvider>,
    store: SessionStore,
    session: RwLock<Option<Session>>,
}

impl AuthContext {
    pub fn new(provider: Arc<dyn AuthProvider>, store: SessionStore) -> Self {
        Self {
            provider,
            store,
            session: RwLock::new(None),
        }
    }

    /// Restore a saved session, if any.
    pub async fn initialize(&self) -> Option<Session> {
        let restored = self.store.load();
        if let Some(s) = &restored {
            debug!(username = %s.username, "Restored session");
        }
        *self.session.write().await = restored.clone();
        restored
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.provider.sign_in(username, password).await?;
        self.store.save(&session)?;
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Forget the session locally even when the provider call fails.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let previous = self.session.write().await.take();
        if let Some(session) = &previous {
            if let Err(e) = self.provider.sign_out(session).await {
                warn!(error = %e, "Provider sign-out failed");
            }
            info!(username = %session.username, "Signed out");
        }
        self.store.clear()?;
        Ok(())
    }

    /// Renew the session if its token is about to expire.
    pub async fn refresh_if_needed(&self) -> Result<Option<Session>, AuthError> {
        let mut guard = self.session.write().await;
        let Some(current) = guard.as_ref() else {
            return Ok(None);
        };
        if !current.needs_refresh(unix_now()) {
            return Ok(Some(current.clone()));
        }
        let renewed = self.provider.refresh(current).await?;
        self.store.save(&renewed)?;
        debug!(username = %renewed.username, "Session renewed");
        *guard = Some(renewed.clone());
        Ok(Some(renewed))
    }

    pub async fn current(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// The session, or an Unauthorized error for commands that need one.
    pub async fn require_session(&self) -> Result<Session, ApiError> {
        self.current()
            .await
            .ok_or_else(|| ApiError::unauthorized("Not signed in. Run `dogwalk login` first"))
    }
}

#[async_trait]
impl TokenSource for AuthContext {
    async fn token(&self) -> Option<String> {
        match self.refresh_if_needed().await {
            Ok(session) => session.map(|s| s.token),
            Err(e) => {
                warn!(error = %e, "Session refresh failed");
                self.current().await.map(|s| s.token)
            }
        }
    }
}
