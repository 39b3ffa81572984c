#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use dogwalk_server::auth::JwtManager;
use dogwalk_core::Dog;
use dogwalk_server::photo::{BreedDetector, BreedGuess, CANDIDATE_BREEDS};
use dogwalk_server::store::MemoryDogStore;
use dogwalk_server::{AppState, ServerConfig, build_router};

const SECRET: &str = "integration-secret";
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

fn config(seed: bool) -> ServerConfig {
    ServerConfig {
        jwt_secret: SECRET.into(),
        seed,
        photo_review_delay: Duration::ZERO,
        photo_base_url: "https://photos.test".into(),
        build_timestamp: Some("2024-05-01T12:00:00Z".into()),
        ..ServerConfig::default()
    }
}

fn app() -> axum::Router {
    build_router(AppState::from_config(&config(true)))
}

fn empty_app() -> axum::Router {
    build_router(AppState::from_config(&config(false)))
}

fn token() -> String {
    JwtManager::new(SECRET.as_bytes(), 3600)
        .issue("alice")
        .unwrap()
        .0
}

/// Send a request and return (status, parsed JSON body or Null).
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = auth {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    read(resp).await
}

async fn send_photo(
    app: &axum::Router,
    id: &str,
    content_type: &str,
    bytes: &'static [u8],
) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("PUT")
        .uri(format!("/api/dogs/{id}/photo"))
        .header(header::AUTHORIZATION, format!("Bearer {}", token()))
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
        .unwrap();
    read(app.clone().oneshot(req).await.unwrap()).await
}

async fn read(resp: axum::response::Response) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn names(body: &Value) -> Vec<&str> {
    body["dogs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect()
}

fn new_dog(name: &str) -> Value {
    json!({"name": name, "energyLevel": 3, "sex": "female", "size": "small"})
}

#[tokio::test]
async fn ping_needs_no_auth() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/plain");
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn version_reports_build_timestamp() {
    let (status, body) = send(&app(), "GET", "/version.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["buildTimestamp"], "2024-05-01T12:00:00Z");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn login_issues_usable_token() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": "walker", "password": "ignored"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], json!({"username": "walker", "email": "walker@example.com"}));

    let token = body["token"].as_str().unwrap();
    let (status, _) = send(&app, "GET", "/api/dogs", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn any_non_empty_username_may_log_in() {
    let (status, body) = send(&app(), "POST", "/auth/login", None, Some(json!({"username": " "}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], " ");

    let (status, _) = send(&app(), "POST", "/auth/login", None, Some(json!({"username": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_without_username_is_rejected() {
    let (status, body) = send(&app(), "POST", "/auth/login", None, Some(json!({"password": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": {"code": 400, "message": "Username is required"}}));
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (status, body) = send(&app(), "GET", "/api/dogs", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": {"code": 401, "message": "No token provided"}}));
}

#[tokio::test]
async fn every_dog_route_requires_a_token() {
    let app = app();
    let routes = [
        ("GET", "/api/dogs/1", None),
        ("POST", "/api/dogs", Some(new_dog("Pip"))),
        ("PUT", "/api/dogs/1", Some(json!({"name": "Rexy"}))),
        ("DELETE", "/api/dogs/1", None),
        ("PUT", "/api/dogs/1/photo", None),
        ("POST", "/api/dogs/5/photo/detect-breed", None),
    ];
    for (method, uri, body) in routes {
        let (status, err) = send(&app, method, uri, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(err["error"]["message"], "No token provided", "{method} {uri}");
    }

    // Nothing above reached the store.
    let (_, dogs) = send(&app, "GET", "/api/dogs?limit=100", Some(&token()), None).await;
    assert_eq!(dogs["dogs"].as_array().unwrap().len(), 15);
    let (_, rex) = send(&app, "GET", "/api/dogs/1", Some(&token()), None).await;
    assert_eq!(rex["name"], "Rex");
    assert!(rex["photoUrl"].is_null());
}

#[tokio::test]
async fn forged_token_is_unauthorized() {
    let forged = JwtManager::new(b"other-secret", 3600).issue("mallory").unwrap().0;
    let (status, body) = send(&app(), "GET", "/api/dogs/1", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid token");
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let expired = JwtManager::new(SECRET.as_bytes(), -120).issue("alice").unwrap().0;
    let (status, body) = send(&app(), "GET", "/api/dogs", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], 401);
    assert_eq!(body["error"]["message"], "Token expired");
}

#[tokio::test]
async fn fifteen_dogs_paginate_twelve_then_three() {
    let app = app();
    let token = token();

    let (status, first) = send(&app, "GET", "/api/dogs?limit=12", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["dogs"].as_array().unwrap().len(), 12);
    let cursor = first["nextToken"].as_str().unwrap();
    assert_eq!(cursor, first["dogs"][11]["id"].as_str().unwrap());

    let (_, second) = send(
        &app,
        "GET",
        &format!("/api/dogs?limit=12&nextToken={cursor}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(names(&second), vec!["Molly", "Tucker", "Zoe"]);
    assert!(second["nextToken"].is_null());
}

#[tokio::test]
async fn default_page_size_is_twelve() {
    let (_, body) = send(&app(), "GET", "/api/dogs", Some(&token()), None).await;
    assert_eq!(body["dogs"].as_array().unwrap().len(), 12);
    assert_eq!(body["nextToken"], "12");
}

#[tokio::test]
async fn stale_cursor_restarts_at_first_page() {
    let app = app();
    let token = token();
    let (status, _) = send(&app, "DELETE", "/api/dogs/4", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", "/api/dogs?limit=2&nextToken=4", Some(&token), None).await;
    assert_eq!(names(&body), vec!["Rex", "Buddy"]);
}

#[tokio::test]
async fn name_search_is_case_insensitive_substring() {
    let app = empty_app();
    let token = token();
    for name in ["Rex", "Max", "Duke"] {
        let (status, _) = send(&app, "POST", "/api/dogs", Some(&token), Some(new_dog(name))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, "GET", "/api/dogs?name=X", Some(&token), None).await;
    assert_eq!(names(&body), vec!["Rex", "Max"]);

    let (_, body) = send(&app, "GET", "/api/dogs?name=ex", Some(&token), None).await;
    assert_eq!(names(&body), vec!["Rex"]);
}

#[tokio::test]
async fn search_cursor_walks_the_filtered_list() {
    let app = app();
    let token = token();
    let (_, first) = send(&app, "GET", "/api/dogs?name=a&limit=3", Some(&token), None).await;
    assert_eq!(names(&first), vec!["Max", "Luna", "Bella"]);
    let cursor = first["nextToken"].as_str().unwrap().to_string();
    assert_eq!(cursor, "5");

    let (_, second) = send(
        &app,
        "GET",
        &format!("/api/dogs?name=a&limit=3&nextToken={cursor}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(names(&second), vec!["Charlie", "Daisy", "Sadie"]);
}

#[tokio::test]
async fn bad_limit_is_a_validation_error() {
    let app = app();
    let token = token();
    let (status, body) = send(&app, "GET", "/api/dogs?limit=0", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 400);

    let (status, body) = send(&app, "GET", "/api/dogs?limit=lots", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 400);
}

#[tokio::test]
async fn create_assigns_fresh_id() {
    let app = app();
    let token = token();
    let (status, dog) = send(&app, "POST", "/api/dogs", Some(&token), Some(new_dog("Pip"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = dog["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert!((1..=15).all(|n| n.to_string() != id));
    assert_eq!(dog["energyLevel"], 3);

    let (status, fetched) = send(&app, "GET", &format!("/api/dogs/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, dog);
}

#[tokio::test]
async fn create_validates_fields() {
    let app = app();
    let token = token();

    let mut body = new_dog("Pip");
    body["energyLevel"] = json!(6);
    let (status, err) = send(&app, "POST", "/api/dogs", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], "energyLevel must be between 1 and 5");

    let (status, err) = send(&app, "POST", "/api/dogs", Some(&token), Some(json!({"name": "Pip"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], "energyLevel, sex, and size are required fields");

    let mut body = new_dog("Pip");
    body["size"] = json!("giant");
    let (status, _) = send(&app, "POST", "/api/dogs", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_validates_supplied_energy_level() {
    let (status, err) = send(
        &app(),
        "PUT",
        "/api/dogs/1",
        Some(&token()),
        Some(json!({"energyLevel": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], 400);
}

#[tokio::test]
async fn update_validates_supplied_sex_and_size() {
    let app = app();
    for body in [json!({"sex": "other"}), json!({"size": "huge"})] {
        let (status, err) = send(&app, "PUT", "/api/dogs/2", Some(&token()), Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(err["error"]["code"], 400);
    }
    let (_, buddy) = send(&app, "GET", "/api/dogs/2", Some(&token()), None).await;
    assert_eq!(buddy["sex"], "male");
    assert_eq!(buddy["size"], "large");
}

#[tokio::test]
async fn update_changes_only_supplied_fields_and_never_photos() {
    let app = app();
    let token = token();
    let (_, before) = send(&app, "GET", "/api/dogs/2", Some(&token), None).await;

    let (status, after) = send(
        &app,
        "PUT",
        "/api/dogs/2",
        Some(&token),
        Some(json!({"specialInstructions": "Avoid the park", "photoUrl": "https://evil", "photoHash": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = before.clone();
    expected["specialInstructions"] = json!("Avoid the park");
    assert_eq!(after, expected);

    let (_, unchanged) = send(&app, "PUT", "/api/dogs/2", Some(&token), Some(json!({}))).await;
    assert_eq!(unchanged, expected);
}

#[tokio::test]
async fn update_missing_dog_is_not_found() {
    let (status, body) = send(&app(), "PUT", "/api/dogs/999", Some(&token()), Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": {"code": 404, "message": "Dog not found"}}));
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = app();
    let token = token();
    let (status, _) = send(&app, "DELETE", "/api/dogs/3", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/api/dogs/3", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/dogs/3", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn photo_requires_jpeg_content_type() {
    let (status, body) = send_photo(&app(), "1", "image/png", b"\x89PNG").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Content-Type must be image/jpeg");
}

#[tokio::test]
async fn photo_requires_body() {
    let (status, body) = send_photo(&app(), "1", "image/jpeg", b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No image data received");
}

#[tokio::test]
async fn photo_for_missing_dog_is_not_found() {
    let (status, _) = send_photo(&app(), "404", "image/jpeg", JPEG).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn photo_upload_persists_url_and_hash() {
    let app = app();
    let (_, before) = send(&app, "GET", "/api/dogs/2", Some(&token()), None).await;

    let (status, dog) = send_photo(&app, "2", "image/jpeg", JPEG).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(dog["photoUrl"], before["photoUrl"]);
    assert_ne!(dog["photoHash"], before["photoHash"]);
    assert_eq!(dog["photoStatus"], "approved");

    let (_, fetched) = send(&app, "GET", "/api/dogs/2", Some(&token()), None).await;
    assert_eq!(fetched["photoUrl"], dog["photoUrl"]);
    assert_eq!(fetched["photoHash"], dog["photoHash"]);
}

#[tokio::test]
async fn oversized_photo_is_too_large() {
    let app = build_router(AppState::from_config(&ServerConfig {
        max_photo_bytes: 16,
        ..config(true)
    }));
    let (status, body) = send_photo(&app, "1", "image/jpeg", &[0xFF; 64]).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        body,
        json!({"error": {"code": 413, "message": "Photo exceeds the maximum upload size"}})
    );

    let (status, _) = send_photo(&app, "1", "image/jpeg", &JPEG[..]).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn large_limit_is_not_capped() {
    let dogs: Vec<Dog> = (1..=150)
        .map(|n| Dog::named(n.to_string(), format!("Dog {n}")))
        .collect();
    let store = Arc::new(MemoryDogStore::with_dogs(dogs, "https://photos.test"));
    let app = build_router(AppState::with_store(store, &config(false)));

    let (status, body) = send(&app, "GET", "/api/dogs?limit=150", Some(&token()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dogs"].as_array().unwrap().len(), 150);
    assert!(body["nextToken"].is_null());
}

#[tokio::test]
async fn non_jpeg_bytes_are_rejected_by_review() {
    let (status, dog) = send_photo(&app(), "1", "image/jpeg", b"definitely not a jpeg").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dog["photoStatus"], "rejected");
}

#[tokio::test]
async fn detect_breed_needs_a_photo() {
    // Rex has no photo in the sample data.
    let (status, body) = send(&app(), "POST", "/api/dogs/1/photo/detect-breed", Some(&token()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No photo available for breed detection");
}

#[tokio::test]
async fn detect_breed_guesses_a_candidate() {
    let (status, body) = send(&app(), "POST", "/api/dogs/5/photo/detect-breed", Some(&token()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "5");
    assert!(CANDIDATE_BREEDS.contains(&body["breed"].as_str().unwrap()));
    let confidence = body["confidence"].as_u64().unwrap();
    assert!((70..=100).contains(&confidence));
}

/// Always answers with the same breed.
struct FixedDetector;

impl BreedDetector for FixedDetector {
    fn detect(&self, _dog: &Dog) -> BreedGuess {
        BreedGuess {
            breed: "Poodle".into(),
            confidence: 91,
        }
    }
}

#[tokio::test]
async fn detect_breed_persists_guess() {
    let app = build_router(AppState::from_config(&config(true)).with_detector(Arc::new(FixedDetector)));
    let token = token();
    let (status, body) = send(&app, "POST", "/api/dogs/5/photo/detect-breed", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "5", "breed": "Poodle", "confidence": 91}));

    let (_, dog) = send(&app, "GET", "/api/dogs/5", Some(&token), None).await;
    assert_eq!(dog["breed"], "Poodle");
}
