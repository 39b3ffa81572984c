//! Cursor pagination over an already-filtered dog sequence.
//!
//! The cursor is the id of the last dog on the previous page. Resolution is a
//! linear scan of the filtered sequence; a cursor that no longer appears
//! (deleted dog, different filter) resumes from the start.

use dogwalk_core::{Dog, DogList};

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Cut one page out of `dogs`.
pub fn paginate(dogs: Vec<Dog>, next_token: Option<&str>, limit: usize) -> DogList {
    let start = next_token
        .and_then(|token| dogs.iter().position(|d| d.id == token))
        .map_or(0, |i| i + 1);
    let end = start.saturating_add(limit).min(dogs.len());
    let has_more = end < dogs.len();

    let page: Vec<Dog> = dogs.into_iter().skip(start).take(end.saturating_sub(start)).collect();
    let next_token = if has_more {
        page.last().map(|d| d.id.clone())
    } else {
        None
    };

    DogList {
        dogs: page,
        next_token,
    }
}
