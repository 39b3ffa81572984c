//! `Dogwalk` Core Library
//!
//! Shared functionality for `Dogwalk` components:
//! - Dog profile data model and REST wire types
//! - Field validation policy for create/update payloads
//! - Common error types and the `{error:{code,message}}` body
//! - Tracing initialisation

pub mod api;
pub mod error;
pub mod model;
pub mod tracing_init;
pub mod validation;

pub use error::{Error, ErrorBody, ErrorDetail, Result};
pub use model::{
    DetectedBreed, Dog, DogChanges, DogInput, DogList, NewDog, PhotoStatus, Sex, Size,
    Socialization,
};
pub use validation::ValidationError;
