//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use crate::pagination::DEFAULT_PAGE_SIZE;

/// Resolved configuration for one server process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub jwt_secret: String,
    /// Lifetime of issued bearer tokens, in seconds.
    pub token_ttl_secs: i64,
    pub page_size: usize,
    /// Start with the sample dogs loaded.
    pub seed: bool,
    /// Prefix for synthesized photo URLs.
    pub photo_base_url: String,
    /// Delay before an uploaded photo leaves `pending`. Zero decides inline.
    pub photo_review_delay: Duration,
    pub max_photo_bytes: usize,
    /// Opaque build stamp reported by `/version.json`.
    pub build_timestamp: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3002)),
            jwt_secret: "dev-secret-change-me".to_string(),
            token_ttl_secs: 24 * 60 * 60,
            page_size: DEFAULT_PAGE_SIZE,
            seed: true,
            photo_base_url: "https://images.dog.ceo/breeds/uploads".to_string(),
            photo_review_delay: Duration::from_millis(1500),
            max_photo_bytes: 10 * 1024 * 1024, // 10 MB
            build_timestamp: None,
        }
    }
}
