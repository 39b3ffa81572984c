//! Headless views over the dog API.
//!
//! Each view owns its state and exposes it through a `tokio::sync::watch`
//! channel so a renderer (the CLI here) can observe it. Background work a view
//! starts is torn down when the view is dropped.

pub mod detail;
pub mod form;
pub mod list;

#[cfg(test)]
pub(crate) mod fake;

pub use detail::{DetailState, DogDetailView};
pub use form::{DogForm, FormError, FormMode, FormValues};
pub use list::{DogListView, ListOptions, ListState};
