//! `POST /auth/login`.
//!
//! Any non-empty username is accepted; the password is never checked.

use axum::Json;
use axum::extract::State;
use tracing::{info, instrument};

use dogwalk_core::api::{LoginRequest, LoginResponse, UserInfo};

use crate::error::ServerError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[instrument(skip_all, fields(username = %req.username))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ServerError> {
    if req.username.is_empty() {
        return Err(ServerError::bad_request("Username is required"));
    }

    let (token, claims) = state
        .jwt
        .issue(&req.username)
        .map_err(|e| ServerError::internal(format!("Token creation failed: {e}")))?;

    info!(expires_at = claims.exp, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            username: claims.username,
            email: claims.email,
        },
    }))
}
