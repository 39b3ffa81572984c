//! In-memory dog store. Contents are lost on restart.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, info};

use dogwalk_core::{Dog, DogChanges, NewDog, PhotoStatus};

use super::{DogStore, StoreError};

/// Thread-safe, insertion-ordered dog collection.
pub struct MemoryDogStore {
    dogs: RwLock<Vec<Dog>>,
    next_id: AtomicU64,
    photo_base_url: String,
}

impl MemoryDogStore {
    pub fn new(photo_base_url: impl Into<String>) -> Self {
        Self::with_dogs(Vec::new(), photo_base_url)
    }

    /// Start from existing records. New ids continue after the largest
    /// numeric id present.
    pub fn with_dogs(dogs: Vec<Dog>, photo_base_url: impl Into<String>) -> Self {
        let max_id = dogs
            .iter()
            .filter_map(|d| d.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            dogs: RwLock::new(dogs),
            next_id: AtomicU64::new(max_id + 1),
            photo_base_url: photo_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn mint_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::Relaxed).to_string()
    }

    /// Hex SHA-256 of the photo bytes.
    fn hash_photo(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    fn photo_url(&self, id: &str, hash: &str) -> String {
        format!("{}/{id}-{}.jpg", self.photo_base_url, &hash[..12])
    }

    async fn modify<F>(&self, id: &str, f: F) -> Result<Dog, StoreError>
    where
        F: FnOnce(&mut Dog) + Send,
    {
        let mut dogs = self.dogs.write().await;
        let dog = dogs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        f(dog);
        Ok(dog.clone())
    }
}

#[async_trait]
impl DogStore for MemoryDogStore {
    async fn list(&self, name_contains: Option<&str>) -> Result<Vec<Dog>, StoreError> {
        let dogs = self.dogs.read().await;
        let Some(needle) = name_contains.map(str::to_lowercase) else {
            return Ok(dogs.clone());
        };
        Ok(dogs
            .iter()
            .filter(|d| d.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Dog, StoreError> {
        self.dogs
            .read()
            .await
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn insert(&self, dog: NewDog) -> Result<Dog, StoreError> {
        let dog = dog.into_dog(self.mint_id());
        self.dogs.write().await.push(dog.clone());
        info!(dog_id = %dog.id, name = %dog.name, "Dog created");
        Ok(dog)
    }

    async fn update(&self, id: &str, changes: DogChanges) -> Result<Dog, StoreError> {
        let dog = self.modify(id, |dog| changes.apply_to(dog)).await?;
        debug!(dog_id = %id, "Dog updated");
        Ok(dog)
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut dogs = self.dogs.write().await;
        let before = dogs.len();
        dogs.retain(|d| d.id != id);
        if dogs.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        info!(dog_id = %id, "Dog deleted");
        Ok(())
    }

    async fn set_photo(&self, id: &str, bytes: &[u8]) -> Result<Dog, StoreError> {
        let hash = Self::hash_photo(bytes);
        let url = self.photo_url(id, &hash);
        let dog = self
            .modify(id, |dog| {
                dog.photo_url = Some(url);
                dog.photo_hash = Some(hash);
                dog.photo_status = Some(PhotoStatus::Pending);
            })
            .await?;
        info!(dog_id = %id, bytes = bytes.len(), "Photo stored");
        Ok(dog)
    }

    async fn set_photo_status(
        &self,
        id: &str,
        photo_hash: &str,
        status: PhotoStatus,
    ) -> Result<Option<Dog>, StoreError> {
        let mut dogs = self.dogs.write().await;
        let dog = dogs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if dog.photo_hash.as_deref() != Some(photo_hash) {
            return Ok(None);
        }
        dog.photo_status = Some(status);
        Ok(Some(dog.clone()))
    }

    async fn set_breed(&self, id: &str, breed: &str) -> Result<Dog, StoreError> {
        self.modify(id, |dog| dog.breed = Some(breed.to_string()))
            .await
    }
}
