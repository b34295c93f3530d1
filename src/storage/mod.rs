//! Storage module for persisting accepted pages
//!
//! This module handles:
//! - Deriving a flat storage key from a page URL's path
//! - The `PageSink` write surface used by the worker pool
//! - A filesystem sink that writes each page atomically

mod fs;
mod key;
mod traits;

pub use fs::FsSink;
pub use key::StorageKey;
pub use traits::{PageSink, PersistenceError, PersistenceResult};
