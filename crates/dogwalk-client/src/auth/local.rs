//! Sign-in against the Dogwalk server's own token endpoint.

use async_trait::async_trait;
use tracing::{info, instrument};

use dogwalk_core::api::{LoginRequest, LoginResponse};

use super::{AuthProvider, Session};
use crate::client::{http_client, send_json, server_root};
use crate::error::{ApiError, NETWORK_ERROR_CODE};

#[derive(Debug, Clone)]
pub struct LocalAuthProvider {
    http: reqwest::Client,
    login_url: String,
}

impl LocalAuthProvider {
    /// Provider for the server whose API root is `base_url`; tokens come from
    /// `/auth/login` on the same origin.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        if base_url.trim().is_empty() {
            return Err(ApiError::new(NETWORK_ERROR_CODE, "API base URL is empty"));
        }
        Ok(Self {
            http: http_client()?,
            login_url: format!("{}/auth/login", server_root(base_url)),
        })
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    #[instrument(skip(self, password), fields(provider = "local"))]
    async fn sign_in(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: Some(password.to_string()),
        };
        let resp: LoginResponse = send_json(self.http.post(&self.login_url).json(&body)).await?;
        info!(username = %resp.user.username, "Signed in");
        Ok(Session {
            token: resp.token,
            username: resp.user.username,
            email: resp.user.email,
            ..Session::default()
        })
    }
}
