//! Photo sub-resources of a dog.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use tracing::{info, instrument};

use dogwalk_core::{DetectedBreed, Dog};

use crate::error::ServerError;
use crate::state::AppState;

const JPEG_MIME: &str = "image/jpeg";

/// True when the media type (parameters ignored) is `image/jpeg`.
fn is_jpeg(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(JPEG_MIME))
}

/// `PUT /api/dogs/{id}/photo` with a raw `image/jpeg` body.
#[instrument(skip(state, headers, body))]
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Dog>, ServerError> {
    state.store.get(&id).await?;

    if !is_jpeg(&headers) {
        return Err(ServerError::bad_request("Content-Type must be image/jpeg"));
    }
    let body = body?;
    if body.is_empty() {
        return Err(ServerError::bad_request("No image data received"));
    }

    let dog = state.store.set_photo(&id, &body).await?;
    let dog = state.reviewer.review(dog, &body).await?;
    Ok(Json(dog))
}

/// `POST /api/dogs/{id}/photo/detect-breed`
#[instrument(skip(state))]
pub async fn detect_breed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DetectedBreed>, ServerError> {
    let dog = state.store.get(&id).await?;
    if !dog.has_photo() {
        return Err(ServerError::bad_request(
            "No photo available for breed detection",
        ));
    }

    let guess = state.detector.detect(&dog);
    state.store.set_breed(&id, &guess.breed).await?;
    info!(dog_id = %id, breed = %guess.breed, confidence = guess.confidence, "Breed detected");

    Ok(Json(DetectedBreed {
        id,
        breed: guess.breed,
        confidence: guess.confidence,
    }))
}
