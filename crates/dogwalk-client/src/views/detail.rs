//! Dog detail view: photo upload with a bounded status poll, breed detection
//! and deletion.
//!
//! After an upload that leaves the photo `pending`, the view re-reads the dog
//! once per [`POLL_INTERVAL`] until the status changes or [`POLL_ATTEMPTS`]
//! reads have been made. The poll task is cancelled when the view is dropped
//! or another upload starts.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use dogwalk_core::{DetectedBreed, Dog};

use crate::client::{DogApi, PhotoUpload};
use crate::error::ApiError;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const POLL_ATTEMPTS: u32 = 5;

pub const JPEG_ONLY_MESSAGE: &str = "Only JPEG images are supported. Please select a JPEG file.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailState {
    pub dog: Option<Dog>,
    pub loading: bool,
    /// A photo status poll is running.
    pub polling: bool,
    pub detected: Option<DetectedBreed>,
    pub deleted: bool,
    pub error: Option<ApiError>,
}

pub struct DogDetailView {
    api: Arc<dyn DogApi>,
    id: String,
    state: Arc<watch::Sender<DetailState>>,
    poll: Mutex<CancellationToken>,
}

impl DogDetailView {
    pub fn new(api: Arc<dyn DogApi>, id: impl Into<String>) -> Self {
        Self {
            api,
            id: id.into(),
            state: Arc::new(watch::Sender::new(DetailState::default())),
            poll: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    pub async fn load(&self) -> Result<Dog, ApiError> {
        self.state.send_modify(|s| s.loading = true);
        let result = self.api.get_dog(&self.id).await;
        self.record(result, |s, dog| s.dog = Some(dog.clone()))
    }

    /// Upload a photo. Anything but JPEG is refused before reaching the server.
    #[instrument(skip(self, photo), fields(dog_id = %self.id, bytes = photo.bytes.len()))]
    pub async fn upload_photo(&self, photo: PhotoUpload) -> Result<Dog, ApiError> {
        if !photo.is_jpeg() {
            let err = ApiError::new(400, JPEG_ONLY_MESSAGE);
            self.state.send_modify(|s| s.error = Some(err.clone()));
            return Err(err);
        }

        let token = self.restart_poll();
        self.state.send_modify(|s| {
            s.loading = true;
            s.polling = false;
        });
        let result = self.api.upload_photo(&self.id, photo).await;
        let dog = self.record(result, |s, dog| {
            s.dog = Some(dog.clone());
            s.detected = None;
        })?;

        if dog.photo_pending() {
            self.state.send_modify(|s| s.polling = true);
            tokio::spawn(poll_photo_status(
                Arc::clone(&self.api),
                self.id.clone(),
                Arc::clone(&self.state),
                token,
            ));
        }
        Ok(dog)
    }

    /// Wait for a running photo poll to finish.
    pub async fn photo_settled(&self) -> DetailState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|s| !s.polling).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    pub async fn detect_breed(&self) -> Result<DetectedBreed, ApiError> {
        self.state.send_modify(|s| s.loading = true);
        let result = self.api.detect_breed(&self.id).await;
        self.record(result, |s, detected| {
            if let Some(dog) = s.dog.as_mut() {
                dog.breed = Some(detected.breed.clone());
            }
            s.detected = Some(detected.clone());
        })
    }

    pub async fn delete(&self) -> Result<(), ApiError> {
        self.cancel_poll();
        self.state.send_modify(|s| {
            s.loading = true;
            s.polling = false;
        });
        let result = self.api.delete_dog(&self.id).await;
        self.record(result, |s, ()| {
            s.deleted = true;
            s.dog = None;
        })
    }

    /// Fold a call result into the state and hand it back.
    fn record<T>(
        &self,
        result: Result<T, ApiError>,
        on_ok: impl FnOnce(&mut DetailState, &T),
    ) -> Result<T, ApiError> {
        self.state.send_modify(|s| {
            s.loading = false;
            match &result {
                Ok(value) => {
                    s.error = None;
                    on_ok(s, value);
                }
                Err(e) => s.error = Some(e.clone()),
            }
        });
        result
    }

    fn restart_poll(&self) -> CancellationToken {
        let mut guard = self.poll.lock().unwrap_or_else(PoisonError::into_inner);
        guard.cancel();
        *guard = CancellationToken::new();
        guard.clone()
    }

    fn cancel_poll(&self) {
        self.poll
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }
}

impl Drop for DogDetailView {
    fn drop(&mut self) {
        self.cancel_poll();
    }
}

async fn poll_photo_status(
    api: Arc<dyn DogApi>,
    id: String,
    state: Arc<watch::Sender<DetailState>>,
    cancel: CancellationToken,
) {
    for attempt in 1..=POLL_ATTEMPTS {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!(dog_id = %id, "Photo poll cancelled");
                return;
            }
            () = tokio::time::sleep(POLL_INTERVAL) => {}
        }

        match api.get_dog(&id).await {
            Ok(dog) => {
                let pending = dog.photo_pending();
                let status = dog.photo_status;
                state.send_modify(|s| s.dog = Some(dog));
                if !pending {
                    info!(dog_id = %id, attempt, status = ?status, "Photo reviewed");
                    break;
                }
            }
            Err(e) => warn!(dog_id = %id, attempt, error = %e, "Photo status check failed"),
        }
    }
    if !cancel.is_cancelled() {
        state.send_modify(|s| s.polling = false);
    }
}
