//! Dogwalk Client Library
//!
//! Everything the `dogwalk` CLI needs to talk to a Dogwalk API server:
//! - REST client with bearer attachment and error normalisation
//! - Sign-in providers (local JWT server, Cognito) and the auth context
//! - Hierarchical client configuration
//! - Headless list, detail and form views

pub mod auth;
pub mod auth_cmd;
pub mod client;
pub mod config;
pub mod dog_cmd;
pub mod dog_fmt;
pub mod error;
pub mod views;

pub use client::{DogApi, DogApiClient, ListQuery, PhotoUpload, TokenSource};
pub use config::{AuthMode, ClientConfig};
pub use error::{ApiError, ErrorKind};
