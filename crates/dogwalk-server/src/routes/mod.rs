//! HTTP routes.
//!
//! - `POST /auth/login` issues a bearer token
//! - `/api/dogs...` resources, all behind [`require_bearer`]
//! - `GET /api/ping` and `GET /version.json`, unauthenticated

pub mod auth;
pub mod dogs;
pub mod meta;
pub mod photo;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_bearer;
use crate::state::AppState;

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/dogs", get(dogs::list_dogs).post(dogs::create_dog))
        .route(
            "/dogs/{id}",
            get(dogs::get_dog)
                .put(dogs::update_dog)
                .delete(dogs::delete_dog),
        )
        .route(
            "/dogs/{id}/photo",
            put(photo::upload_photo).layer(DefaultBodyLimit::max(state.max_photo_bytes)),
        )
        .route("/dogs/{id}/photo/detect-breed", post(photo::detect_breed))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    let api = Router::new()
        .route("/ping", get(meta::ping))
        .merge(protected);

    Router::new()
        .nest("/api", api)
        .route("/auth/login", post(auth::login))
        .route("/version.json", get(meta::version))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
