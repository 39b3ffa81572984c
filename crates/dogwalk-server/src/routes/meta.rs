//! Unauthenticated service endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;

use dogwalk_core::api::VersionInfo;

use crate::state::AppState;

/// `GET /api/ping`
pub async fn ping() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/plain")], "OK")
}

/// `GET /version.json`
pub async fn version(State(state): State<AppState>) -> Json<VersionInfo> {
    Json(state.version.as_ref().clone())
}
