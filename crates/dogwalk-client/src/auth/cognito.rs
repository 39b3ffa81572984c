//! Sign-in against a Cognito user pool.
//!
//! Uses the `USER_PASSWORD_AUTH` flow of `InitiateAuth`, then `GetUser` for the
//! email attribute. The ID token becomes the bearer token for the API; the
//! refresh token renews it through `REFRESH_TOKEN_AUTH`, and sign-out revokes
//! every token with `GlobalSignOut`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::session::unix_now;
use super::{AuthProvider, Session};
use crate::client::{http_client, send_json};
use crate::error::{ApiError, NETWORK_ERROR_CODE};

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthRequest<'a> {
    auth_flow: &'static str,
    client_id: &'a str,
    auth_parameters: AuthParameters<'a>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct AuthParameters<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    #[serde(default)]
    authentication_result: Option<AuthenticationResult>,
    #[serde(default)]
    challenge_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    id_token: String,
    access_token: String,
    /// Absent on refresh; the existing refresh token stays valid.
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AccessTokenRequest<'a> {
    access_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetUserResponse {
    username: String,
    #[serde(default)]
    user_attributes: Vec<UserAttribute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserAttribute {
    name: String,
    value: String,
}

#[derive(Debug, Clone)]
pub struct CognitoAuthProvider {
    http: reqwest::Client,
    endpoint: String,
    client_id: String,
}

impl CognitoAuthProvider {
    /// Provider for an app client of the pool `user_pool_id` (`<region>_<id>`).
    pub fn new(region: &str, user_pool_id: &str, client_id: &str) -> Result<Self, ApiError> {
        if region.is_empty() || client_id.is_empty() {
            return Err(ApiError::new(
                NETWORK_ERROR_CODE,
                "Cognito sign-in needs a region and an app client id",
            ));
        }
        if user_pool_id.split_once('_').is_none_or(|(r, _)| r != region) {
            return Err(ApiError::new(
                NETWORK_ERROR_CODE,
                format!("Cognito user pool {user_pool_id} is not in region {region}"),
            ));
        }
        Ok(Self {
            http: http_client()?,
            endpoint: format!("https://cognito-idp.{region}.amazonaws.com/"),
            client_id: client_id.to_string(),
        })
    }

    /// Point the provider at a different identity endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn call<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = serde_json::to_vec(body)
            .map_err(|e| ApiError::new(NETWORK_ERROR_CODE, format!("Cannot encode request: {e}")))?;
        let req = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, AMZ_JSON)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{action}"))
            .body(payload);
        send_json(req).await
    }

    async fn initiate_auth(
        &self,
        auth_flow: &'static str,
        auth_parameters: AuthParameters<'_>,
    ) -> Result<AuthenticationResult, ApiError> {
        let resp: InitiateAuthResponse = self
            .call(
                "InitiateAuth",
                &InitiateAuthRequest {
                    auth_flow,
                    client_id: &self.client_id,
                    auth_parameters,
                },
            )
            .await?;
        resp.authentication_result.ok_or_else(|| {
            let challenge = resp.challenge_name.unwrap_or_else(|| "unknown".into());
            ApiError::unauthorized(format!("Sign-in needs an additional step ({challenge})"))
        })
    }
}

fn expiry(expires_in: Option<i64>) -> Option<i64> {
    expires_in.map(|secs| unix_now() + secs)
}

#[async_trait]
impl AuthProvider for CognitoAuthProvider {
    fn name(&self) -> &'static str {
        "cognito"
    }

    #[instrument(skip(self, password), fields(provider = "cognito"))]
    async fn sign_in(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let tokens = self
            .initiate_auth(
                "USER_PASSWORD_AUTH",
                AuthParameters {
                    username: Some(username),
                    password: Some(password),
                    ..AuthParameters::default()
                },
            )
            .await?;

        let user: GetUserResponse = self
            .call(
                "GetUser",
                &AccessTokenRequest {
                    access_token: &tokens.access_token,
                },
            )
            .await?;
        let email = user
            .user_attributes
            .into_iter()
            .find(|a| a.name == "email")
            .map_or_else(String::new, |a| a.value);

        info!(username = %user.username, "Signed in");
        Ok(Session {
            token: tokens.id_token,
            username: user.username,
            email,
            access_token: Some(tokens.access_token),
            refresh_token: tokens.refresh_token,
            expires_at: expiry(tokens.expires_in),
        })
    }

    #[instrument(skip_all, fields(provider = "cognito", username = %session.username))]
    async fn refresh(&self, session: &Session) -> Result<Session, ApiError> {
        let Some(refresh_token) = session.refresh_token.as_deref() else {
            return Err(ApiError::unauthorized(
                "Session expired. Run `dogwalk login` again",
            ));
        };
        let tokens = self
            .initiate_auth(
                "REFRESH_TOKEN_AUTH",
                AuthParameters {
                    refresh_token: Some(refresh_token),
                    ..AuthParameters::default()
                },
            )
            .await?;

        debug!("Tokens refreshed");
        Ok(Session {
            token: tokens.id_token,
            access_token: Some(tokens.access_token),
            refresh_token: tokens.refresh_token.or_else(|| session.refresh_token.clone()),
            expires_at: expiry(tokens.expires_in),
            ..session.clone()
        })
    }

    #[instrument(skip_all, fields(provider = "cognito", username = %session.username))]
    async fn sign_out(&self, session: &Session) -> Result<(), ApiError> {
        let Some(access_token) = session.access_token.as_deref() else {
            return Ok(());
        };
        let _: IgnoredAny = self
            .call("GlobalSignOut", &AccessTokenRequest { access_token })
            .await?;
        info!("Tokens revoked");
        Ok(())
    }
}
