//! Authentication: sign-in providers, the persisted session and the auth context.
//!
//! Two strategies exist, chosen once from [`ClientConfig::auth`]:
//! - [`LocalAuthProvider`]: the Dogwalk server's own `POST /auth/login`
//! - [`CognitoAuthProvider`]: the hosted user pool's `InitiateAuth`, with
//!   token refresh and global sign-out
//!
//! [`ClientConfig::auth`]: crate::config::ClientConfig::auth

pub mod cognito;
pub mod context;
pub mod local;
pub mod session;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use cognito::CognitoAuthProvider;
pub use context::AuthContext;
pub use local::LocalAuthProvider;
pub use session::{Session, SessionStore};

use crate::config::{AuthMode, ClientConfig};
use crate::error::ApiError;

/// Errors from signing in or out.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to persist session: {0}")]
    Storage(#[from] dogwalk_core::Error),
}

/// A way of exchanging credentials for a bearer token.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Short name for logs and status output.
    fn name(&self) -> &'static str;

    async fn sign_in(&self, username: &str, password: &str) -> Result<Session, ApiError>;

    /// Renew an expiring session. Providers without renewal ask for a new sign-in.
    async fn refresh(&self, _session: &Session) -> Result<Session, ApiError> {
        Err(ApiError::unauthorized(
            "Session expired. Run `dogwalk login` again",
        ))
    }

    /// Provider-side sign-out. Local sessions are simply forgotten.
    async fn sign_out(&self, _session: &Session) -> Result<(), ApiError> {
        Ok(())
    }
}

/// The provider selected by configuration.
pub fn provider_for(config: &ClientConfig) -> Result<Arc<dyn AuthProvider>, ApiError> {
    Ok(match &config.auth {
        AuthMode::Local => Arc::new(LocalAuthProvider::new(&config.api_base_url)?),
        AuthMode::Cognito {
            region,
            user_pool_id,
            client_id,
        } => Arc::new(CognitoAuthProvider::new(region, user_pool_id, client_id)?),
    })
}
