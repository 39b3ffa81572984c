//! Shared application state handed to every handler.

use std::sync::Arc;

use dogwalk_core::api::VersionInfo;

use crate::auth::JwtManager;
use crate::config::ServerConfig;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::photo::{BreedDetector, PhotoReviewer, RandomBreedDetector};
use crate::store::{DogStore, MemoryDogStore, sample_dogs};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DogStore>,
    pub jwt: Arc<JwtManager>,
    pub reviewer: Arc<PhotoReviewer>,
    pub detector: Arc<dyn BreedDetector>,
    /// Page size used when a list request carries no `limit`.
    pub page_size: usize,
    pub max_photo_bytes: usize,
    pub version: Arc<VersionInfo>,
}

impl AppState {
    /// State backed by the in-memory store, seeded when the config asks.
    pub fn from_config(config: &ServerConfig) -> Self {
        let dogs = if config.seed { sample_dogs() } else { Vec::new() };
        let store: Arc<dyn DogStore> =
            Arc::new(MemoryDogStore::with_dogs(dogs, config.photo_base_url.clone()));
        Self::with_store(store, config)
    }

    /// State around an injected store.
    pub fn with_store(store: Arc<dyn DogStore>, config: &ServerConfig) -> Self {
        let build_timestamp = config
            .build_timestamp
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
        let page_size = if config.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            config.page_size
        };

        Self {
            reviewer: Arc::new(PhotoReviewer::new(
                Arc::clone(&store),
                config.photo_review_delay,
            )),
            store,
            jwt: Arc::new(JwtManager::new(
                config.jwt_secret.as_bytes(),
                config.token_ttl_secs,
            )),
            detector: Arc::new(RandomBreedDetector),
            page_size,
            max_photo_bytes: config.max_photo_bytes,
            version: Arc::new(VersionInfo {
                version: env!("CARGO_PKG_VERSION").to_string(),
                build_timestamp,
            }),
        }
    }

    /// Swap the breed detector.
    #[must_use]
    pub fn with_detector(mut self, detector: Arc<dyn BreedDetector>) -> Self {
        self.detector = detector;
        self
    }
}
