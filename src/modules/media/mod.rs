//! Media module - local file storage for uploaded images
//!
//! Provides PNG-normalizing storage, best-effort cleanup, and healing of
//! stale image references.

mod media_store;

pub use media_store::{FileCleanup, MediaStore};
