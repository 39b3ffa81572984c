//! Breed detection. The shipped detector is a stand-in that guesses.

use rand::RngExt;

use dogwalk_core::Dog;

/// Labels the stand-in detector chooses from.
pub const CANDIDATE_BREEDS: &[&str] = &[
    "Golden Retriever",
    "Labrador",
    "German Shepherd",
    "Beagle",
    "Poodle",
    "Bulldog",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreedGuess {
    pub breed: String,
    /// Percentage in `70..=100`.
    pub confidence: u8,
}

/// Classifies the breed shown in a dog's photo.
pub trait BreedDetector: Send + Sync {
    fn detect(&self, dog: &Dog) -> BreedGuess;
}

/// Picks a uniformly random candidate breed with a confidence in `70..=100`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBreedDetector;

impl BreedDetector for RandomBreedDetector {
    fn detect(&self, _dog: &Dog) -> BreedGuess {
        let mut rng = rand::rng();
        let breed = CANDIDATE_BREEDS[rng.random_range(0..CANDIDATE_BREEDS.len())];
        BreedGuess {
            breed: breed.to_string(),
            confidence: rng.random_range(70..=100),
        }
    }
}
