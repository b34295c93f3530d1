//! Deduplication module
//!
//! Two independent levels of duplicate suppression run side by side:
//! - URL identity: a canonical page URL is admitted at most once
//! - Content identity: a body digest is admitted at most once
//!
//! Both live in a [`DedupIndex`] created empty at the start of a run and
//! dropped at its end. Nothing is persisted across runs.

mod digest;
mod index;

pub use digest::ContentDigest;
pub use index::DedupIndex;
