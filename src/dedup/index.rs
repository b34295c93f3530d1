//! In-memory deduplication index
//!
//! Each set sits behind its own mutex and is only reachable through a combined
//! check-and-insert. The lock spans both halves, so for any key exactly one
//! caller ever sees `true`.

use crate::dedup::ContentDigest;
use crate::url::PageUrl;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Visited-URL and seen-digest sets with atomic admission
#[derive(Debug, Default)]
pub struct DedupIndex {
    visited: Mutex<HashSet<PageUrl>>,
    seen: Mutex<HashSet<ContentDigest>>,
}

/// Locks a set, recovering it if another holder panicked
///
/// The sets are only ever grown by a single `insert`, so a poisoned guard
/// still holds a consistent set.
fn lock<T>(set: &Mutex<HashSet<T>>) -> MutexGuard<'_, HashSet<T>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DedupIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` as visited
    ///
    /// # Returns
    ///
    /// `true` iff the URL had not been admitted before. A `false` result
    /// changes nothing.
    pub fn admit_url(&self, url: &PageUrl) -> bool {
        let mut visited = lock(&self.visited);
        if visited.contains(url) {
            return false;
        }
        visited.insert(url.clone())
    }

    /// Records `digest` as seen
    ///
    /// # Returns
    ///
    /// `true` iff no body with this digest had been admitted before.
    pub fn admit_digest(&self, digest: ContentDigest) -> bool {
        lock(&self.seen).insert(digest)
    }

    /// Number of distinct URLs admitted so far
    pub fn visited_count(&self) -> usize {
        lock(&self.visited).len()
    }

    /// Number of distinct digests admitted so far
    pub fn digest_count(&self) -> usize {
        lock(&self.seen).len()
    }
}
