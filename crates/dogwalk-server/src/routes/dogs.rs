//! `/api/dogs` collection and item resources.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use dogwalk_core::validation::{validate_changes, validate_new};
use dogwalk_core::{Dog, DogInput, DogList};

use crate::auth::Claims;
use crate::error::ServerError;
use crate::extract::{ApiJson, ApiQuery};
use crate::pagination::paginate;
use crate::state::AppState;

/// Query string of `GET /api/dogs`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub name: Option<String>,
    pub next_token: Option<String>,
    pub limit: Option<usize>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// `GET /api/dogs?name=&nextToken=&limit=`
#[instrument(skip(state, claims), fields(user = %claims.username))]
pub async fn list_dogs(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<DogList>, ServerError> {
    let limit = match params.limit {
        Some(0) => return Err(ServerError::bad_request("limit must be a positive integer")),
        Some(n) => n,
        None => state.page_size,
    };

    let dogs = state.store.list(non_empty(params.name.as_ref())).await?;
    let page = paginate(dogs, non_empty(params.next_token.as_ref()), limit);
    debug!(
        returned = page.dogs.len(),
        has_more = page.next_token.is_some(),
        "Listed dogs"
    );
    Ok(Json(page))
}

/// `GET /api/dogs/{id}`
#[instrument(skip(state))]
pub async fn get_dog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Dog>, ServerError> {
    Ok(Json(state.store.get(&id).await?))
}

/// `POST /api/dogs`
#[instrument(skip_all, fields(user = %claims.username))]
pub async fn create_dog(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(input): ApiJson<DogInput>,
) -> Result<(StatusCode, Json<Dog>), ServerError> {
    let new_dog = validate_new(input)?;
    let dog = state.store.insert(new_dog).await?;
    Ok((StatusCode::CREATED, Json(dog)))
}

/// `PUT /api/dogs/{id}`. Photo fields in the body are ignored.
#[instrument(skip(state, claims, input), fields(user = %claims.username))]
pub async fn update_dog(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<DogInput>,
) -> Result<Json<Dog>, ServerError> {
    state.store.get(&id).await?;
    let changes = validate_changes(input)?;
    let dog = state.store.update(&id, changes).await?;
    Ok(Json(dog))
}

/// `DELETE /api/dogs/{id}`
#[instrument(skip(state, claims), fields(user = %claims.username))]
pub async fn delete_dog(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.store.remove(&id).await?;
    info!(dog_id = %id, "Dog removed by request");
    Ok(StatusCode::NO_CONTENT)
}
