//! Photo review.
//!
//! An uploaded photo starts `pending`. The reviewer approves it when the bytes
//! open with a JPEG start-of-image marker and rejects it otherwise. With a
//! non-zero delay the decision lands later from a background task, which is
//! what the detail view's status poll waits for.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use dogwalk_core::{Dog, PhotoStatus};

use crate::store::{DogStore, StoreError};

/// JPEG start-of-image marker.
pub const JPEG_SOI: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Decide the review outcome for a photo body.
pub fn verdict(bytes: &[u8]) -> PhotoStatus {
    if bytes.starts_with(JPEG_SOI) {
        PhotoStatus::Approved
    } else {
        PhotoStatus::Rejected
    }
}

pub struct PhotoReviewer {
    store: Arc<dyn DogStore>,
    delay: Duration,
}

impl PhotoReviewer {
    pub fn new(store: Arc<dyn DogStore>, delay: Duration) -> Self {
        Self { store, delay }
    }

    /// Queue a review of the photo just stored on `dog`.
    ///
    /// Returns the dog as the client should see it right now: reviewed when
    /// the delay is zero, still `pending` otherwise.
    pub async fn review(&self, dog: Dog, bytes: &[u8]) -> Result<Dog, StoreError> {
        let Some(hash) = dog.photo_hash.clone() else {
            return Ok(dog);
        };
        let status = verdict(bytes);

        if self.delay.is_zero() {
            let reviewed = self.store.set_photo_status(&dog.id, &hash, status).await?;
            return Ok(reviewed.unwrap_or(dog));
        }

        let store = Arc::clone(&self.store);
        let delay = self.delay;
        let id = dog.id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match store.set_photo_status(&id, &hash, status).await {
                Ok(Some(_)) => info!(dog_id = %id, status = %status, "Photo reviewed"),
                Ok(None) => debug!(dog_id = %id, "Photo replaced before review finished"),
                Err(e) => warn!(dog_id = %id, error = %e, "Photo review could not be recorded"),
            }
        });
        Ok(dog)
    }
}
