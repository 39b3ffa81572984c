//! Mock photo pipeline: review of uploaded photos and breed detection.

pub mod detect;
pub mod review;

pub use detect::{BreedDetector, BreedGuess, CANDIDATE_BREEDS, RandomBreedDetector};
pub use review::{PhotoReviewer, verdict};
