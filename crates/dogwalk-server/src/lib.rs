//! Dogwalk API Server Library
//!
//! Core functionality for the Dogwalk API server:
//! - Dog store abstraction with an in-memory implementation
//! - JWT issuance and bearer-token verification
//! - REST resources for the dog collection, photos and breed detection
//! - Mock photo review and breed detection

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod photo;
pub mod routes;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::ServerError;
pub use routes::build_router;
pub use state::AppState;
