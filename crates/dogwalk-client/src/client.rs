//! Dogwalk REST API client.
//!
//! Uses reqwest to call the `/dogs` resources under the configured API root
//! (`http://localhost:3002/api` for the local server). Every request carries the
//! bearer token from the configured [`TokenSource`] when one is available, and
//! every failure comes back as an [`ApiError`].

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use dogwalk_core::api::VersionInfo;
use dogwalk_core::{DetectedBreed, Dog, DogChanges, DogList, NewDog};

use crate::error::{ApiError, NETWORK_ERROR_CODE};

pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Supplies the bearer token for outgoing requests.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Option<String>;
}

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Parameters of `GET /dogs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub name: Option<String>,
    pub next_token: Option<String>,
    pub limit: Option<usize>,
}

/// Raw photo bytes with the content type they will be sent under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            content_type: JPEG_CONTENT_TYPE.to_string(),
            bytes,
        }
    }

    /// Read a file, taking the content type from its extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let content_type = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jpg" | "jpeg") => JPEG_CONTENT_TYPE,
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        };
        Ok(Self {
            content_type: content_type.to_string(),
            bytes: std::fs::read(path)?,
        })
    }

    pub fn is_jpeg(&self) -> bool {
        self.content_type.eq_ignore_ascii_case(JPEG_CONTENT_TYPE)
    }
}

/// The dog resource operations the views depend on.
#[async_trait]
pub trait DogApi: Send + Sync {
    async fn list_dogs(&self, query: &ListQuery) -> Result<DogList, ApiError>;
    async fn get_dog(&self, id: &str) -> Result<Dog, ApiError>;
    async fn create_dog(&self, dog: &NewDog) -> Result<Dog, ApiError>;
    async fn update_dog(&self, id: &str, changes: &DogChanges) -> Result<Dog, ApiError>;
    async fn delete_dog(&self, id: &str) -> Result<(), ApiError>;
    async fn upload_photo(&self, id: &str, photo: PhotoUpload) -> Result<Dog, ApiError>;
    async fn detect_breed(&self, id: &str) -> Result<DetectedBreed, ApiError>;
}

/// Build a reqwest client with the TLS provider in place.
pub(crate) fn http_client() -> Result<reqwest::Client, ApiError> {
    // reqwest uses rustls-no-provider; `Err` means a provider is already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();
    reqwest::Client::builder()
        .user_agent(concat!("dogwalk/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ApiError::network(&e))
}

/// The origin serving the API root, e.g. `http://localhost:3002` for
/// `http://localhost:3002/api`. Roots without an `/api` suffix are returned as is.
pub(crate) fn server_root(base_url: &str) -> &str {
    let base = base_url.trim_end_matches('/');
    base.strip_suffix("/api").unwrap_or(base)
}

/// Send a request and decode a JSON success body.
pub(crate) async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ApiError> {
    let resp = send(req).await?;
    let status = resp.status().as_u16();
    let bytes = resp.bytes().await.map_err(|e| ApiError::network(&e))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        ApiError::new(
            NETWORK_ERROR_CODE,
            format!("Unexpected response body (status {status}): {e}"),
        )
    })
}

/// Send a request, turning transport failures and non-2xx statuses into [`ApiError`].
pub(crate) async fn send(req: RequestBuilder) -> Result<reqwest::Response, ApiError> {
    let resp = req.send().await.map_err(|e| ApiError::network(&e))?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.bytes().await.unwrap_or_default();
    let err = ApiError::from_response(status.as_u16(), &body);
    debug!(status = status.as_u16(), message = %err.message, "Request failed");
    Err(err)
}

/// Dogwalk REST API client.
#[derive(Clone)]
pub struct DogApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl std::fmt::Debug for DogApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DogApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl DogApiClient {
    /// Client for the API rooted at `base_url` (e.g. `http://localhost:3002/api`).
    pub fn new(base_url: &str, tokens: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        if base_url.trim().is_empty() {
            return Err(ApiError::new(NETWORK_ERROR_CODE, "API base URL is empty"));
        }
        Ok(Self {
            http: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for a path under the API root.
    pub(crate) fn url(&self, path: &str) -> Result<Url, ApiError> {
        parse_url(&format!("{}{path}", self.base_url))
    }

    fn dog_url(&self, id: &str, suffix: &str) -> Result<Url, ApiError> {
        let mut url = self.url("/dogs")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::new(NETWORK_ERROR_CODE, "API base URL cannot hold a path"))?
            .push(id)
            .extend(suffix.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.http.request(method, url);
        match self.tokens.token().await {
            Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        }
    }

    /// `GET /ping`
    pub async fn ping(&self) -> Result<String, ApiError> {
        let resp = send(self.http.get(self.url("/ping")?)).await?;
        resp.text().await.map_err(|e| ApiError::network(&e))
    }

    /// `GET /version.json` on the server origin.
    pub async fn version(&self) -> Result<VersionInfo, ApiError> {
        let url = parse_url(&format!("{}/version.json", server_root(&self.base_url)))?;
        send_json(self.http.get(url)).await
    }
}

fn parse_url(raw: &str) -> Result<Url, ApiError> {
    Url::parse(raw).map_err(|e| ApiError::new(NETWORK_ERROR_CODE, format!("Invalid URL: {e}")))
}

#[async_trait]
impl DogApi for DogApiClient {
    async fn list_dogs(&self, query: &ListQuery) -> Result<DogList, ApiError> {
        let mut url = self.url("/dogs")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(name) = query.name.as_deref().filter(|n| !n.is_empty()) {
                pairs.append_pair("name", name);
            }
            if let Some(token) = query.next_token.as_deref() {
                pairs.append_pair("nextToken", token);
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        send_json(self.request(Method::GET, url).await).await
    }

    async fn get_dog(&self, id: &str) -> Result<Dog, ApiError> {
        let url = self.dog_url(id, "")?;
        send_json(self.request(Method::GET, url).await).await
    }

    async fn create_dog(&self, dog: &NewDog) -> Result<Dog, ApiError> {
        let url = self.url("/dogs")?;
        send_json(self.request(Method::POST, url).await.json(dog)).await
    }

    async fn update_dog(&self, id: &str, changes: &DogChanges) -> Result<Dog, ApiError> {
        let url = self.dog_url(id, "")?;
        send_json(self.request(Method::PUT, url).await.json(changes)).await
    }

    async fn delete_dog(&self, id: &str) -> Result<(), ApiError> {
        let url = self.dog_url(id, "")?;
        send(self.request(Method::DELETE, url).await).await?;
        Ok(())
    }

    async fn upload_photo(&self, id: &str, photo: PhotoUpload) -> Result<Dog, ApiError> {
        let url = self.dog_url(id, "photo")?;
        let req = self
            .request(Method::PUT, url)
            .await
            .header(CONTENT_TYPE, photo.content_type)
            .body(photo.bytes);
        send_json(req).await
    }

    async fn detect_breed(&self, id: &str) -> Result<DetectedBreed, ApiError> {
        let url = self.dog_url(id, "photo/detect-breed")?;
        send_json(self.request(Method::POST, url).await).await
    }
}
