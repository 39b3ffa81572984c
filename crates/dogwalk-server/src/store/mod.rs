//! Dog storage for the Dogwalk API server.
//!
//! Resource handlers only see the [`DogStore`] trait, so a persistent backend
//! can replace [`MemoryDogStore`] without touching the routes.

mod memory;
mod seed;

use async_trait::async_trait;

use dogwalk_core::{Dog, DogChanges, NewDog, PhotoStatus};

pub use memory::MemoryDogStore;
pub use seed::sample_dogs;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Dog not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Ordered collection of dog records. Insertion order is iteration order.
#[async_trait]
pub trait DogStore: Send + Sync {
    /// All dogs in insertion order, optionally narrowed to names containing
    /// `name_contains` (case-insensitive).
    async fn list(&self, name_contains: Option<&str>) -> Result<Vec<Dog>, StoreError>;

    async fn get(&self, id: &str) -> Result<Dog, StoreError>;

    /// Store a new dog under a freshly minted id.
    async fn insert(&self, dog: NewDog) -> Result<Dog, StoreError>;

    async fn update(&self, id: &str, changes: DogChanges) -> Result<Dog, StoreError>;

    async fn remove(&self, id: &str) -> Result<(), StoreError>;

    /// Attach photo bytes. Sets the photo URL and hash and marks the photo
    /// `pending` review.
    async fn set_photo(&self, id: &str, bytes: &[u8]) -> Result<Dog, StoreError>;

    /// Record a review outcome, but only while `photo_hash` is still the
    /// current photo. Returns `None` when a newer upload superseded it.
    async fn set_photo_status(
        &self,
        id: &str,
        photo_hash: &str,
        status: PhotoStatus,
    ) -> Result<Option<Dog>, StoreError>;

    async fn set_breed(&self, id: &str, breed: &str) -> Result<Dog, StoreError>;
}
