//! In-memory [`DogApi`] for view tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use dogwalk_core::{DetectedBreed, Dog, DogChanges, DogList, NewDog, PhotoStatus};

use crate::client::{DogApi, ListQuery, PhotoUpload};
use crate::error::ApiError;

#[derive(Default)]
pub struct FakeApi {
    pub dogs: Mutex<Vec<Dog>>,
    pub list_calls: Mutex<Vec<ListQuery>>,
    pub get_calls: Mutex<usize>,
    pub uploads: Mutex<usize>,
    /// Artificial latency of `list_dogs`, keyed by search text.
    pub list_delay: Mutex<HashMap<String, Duration>>,
    /// How many `get_dog` calls keep reporting a pending photo.
    pub pending_reads: Mutex<usize>,
}

#[allow(clippy::unwrap_used)]
impl FakeApi {
    pub fn with_dogs(names: &[&str]) -> Self {
        let dogs = names
            .iter()
            .enumerate()
            .map(|(i, n)| Dog::named((i + 1).to_string(), *n))
            .collect();
        Self {
            dogs: Mutex::new(dogs),
            ..Self::default()
        }
    }

    pub fn list_calls(&self) -> Vec<ListQuery> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn get_calls(&self) -> usize {
        *self.get_calls.lock().unwrap()
    }

    fn find(&self, id: &str) -> Result<Dog, ApiError> {
        self.dogs
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| ApiError::new(404, "Dog not found"))
    }
}

#[allow(clippy::unwrap_used)]
#[async_trait]
impl DogApi for FakeApi {
    async fn list_dogs(&self, query: &ListQuery) -> Result<DogList, ApiError> {
        self.list_calls.lock().unwrap().push(query.clone());
        let delay = self
            .list_delay
            .lock()
            .unwrap()
            .get(query.name.as_deref().unwrap_or(""))
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let needle = query.name.as_deref().unwrap_or("").to_lowercase();
        let matching: Vec<Dog> = self
            .dogs
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let start = query
            .next_token
            .as_deref()
            .and_then(|t| matching.iter().position(|d| d.id == t))
            .map_or(0, |i| i + 1);
        let limit = query.limit.unwrap_or(12);
        let page: Vec<Dog> = matching.iter().skip(start).take(limit).cloned().collect();
        let next_token = (start + page.len() < matching.len())
            .then(|| page.last().map(|d| d.id.clone()))
            .flatten();
        Ok(DogList {
            dogs: page,
            next_token,
        })
    }

    async fn get_dog(&self, id: &str) -> Result<Dog, ApiError> {
        *self.get_calls.lock().unwrap() += 1;
        let mut dog = self.find(id)?;
        let mut pending = self.pending_reads.lock().unwrap();
        if *pending > 0 {
            *pending -= 1;
            dog.photo_status = Some(PhotoStatus::Pending);
        }
        Ok(dog)
    }

    async fn create_dog(&self, dog: &NewDog) -> Result<Dog, ApiError> {
        let mut dogs = self.dogs.lock().unwrap();
        let created = dog.clone().into_dog((dogs.len() + 100).to_string());
        dogs.push(created.clone());
        Ok(created)
    }

    async fn update_dog(&self, id: &str, changes: &DogChanges) -> Result<Dog, ApiError> {
        let mut dogs = self.dogs.lock().unwrap();
        let dog = dogs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| ApiError::new(404, "Dog not found"))?;
        changes.clone().apply_to(dog);
        Ok(dog.clone())
    }

    async fn delete_dog(&self, id: &str) -> Result<(), ApiError> {
        let mut dogs = self.dogs.lock().unwrap();
        let before = dogs.len();
        dogs.retain(|d| d.id != id);
        if dogs.len() == before {
            return Err(ApiError::new(404, "Dog not found"));
        }
        Ok(())
    }

    async fn upload_photo(&self, id: &str, photo: PhotoUpload) -> Result<Dog, ApiError> {
        *self.uploads.lock().unwrap() += 1;
        let mut dogs = self.dogs.lock().unwrap();
        let dog = dogs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| ApiError::new(404, "Dog not found"))?;
        dog.photo_url = Some(format!("https://photos.test/{id}.jpg"));
        dog.photo_hash = Some(format!("len{}", photo.bytes.len()));
        dog.photo_status = Some(PhotoStatus::Approved);
        let mut uploaded = dog.clone();
        uploaded.photo_status = Some(PhotoStatus::Pending);
        Ok(uploaded)
    }

    async fn detect_breed(&self, id: &str) -> Result<DetectedBreed, ApiError> {
        let mut dogs = self.dogs.lock().unwrap();
        let dog = dogs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| ApiError::new(404, "Dog not found"))?;
        if !dog.has_photo() {
            return Err(ApiError::new(400, "No photo available for breed detection"));
        }
        dog.breed = Some("Beagle".into());
        Ok(DetectedBreed {
            id: id.to_string(),
            breed: "Beagle".into(),
            confidence: 88,
        })
    }
}
