//! Shared backlog of URLs waiting to be fetched
//!
//! The backlog is filled once before the workers start and only drained
//! afterwards. `pop` is the only way out, and each URL instance leaves
//! through exactly one call.

use crate::url::PageUrl;
use std::collections::VecDeque;
use std::sync::Mutex;

/// FIFO backlog shared by all workers
#[derive(Debug, Default)]
pub struct Backlog {
    queue: Mutex<VecDeque<PageUrl>>,
}

impl Backlog {
    /// Creates a backlog holding `urls` in order
    pub fn new(urls: impl IntoIterator<Item = PageUrl>) -> Self {
        Self {
            queue: Mutex::new(urls.into_iter().collect()),
        }
    }

    /// Removes and returns the next URL, or `None` once drained
    pub fn pop(&self) -> Option<PageUrl> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }

    /// Number of URLs still waiting
    pub fn len(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns true if no URLs are waiting
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn urls(n: usize) -> Vec<PageUrl> {
        (0..n)
            .map(|i| PageUrl::parse(&format!("https://example.com/{i}")).unwrap())
            .collect()
    }

    #[test]
    fn test_fifo_order() {
        let backlog = Backlog::new(urls(3));
        assert_eq!(backlog.len(), 3);
        assert_eq!(backlog.pop().unwrap().as_str(), "https://example.com/0");
        assert_eq!(backlog.pop().unwrap().as_str(), "https://example.com/1");
        assert_eq!(backlog.pop().unwrap().as_str(), "https://example.com/2");
        assert!(backlog.pop().is_none());
        assert!(backlog.is_empty());
    }

    #[test]
    fn test_concurrent_pop_never_duplicates() {
        let backlog = Backlog::new(urls(1000));
        let popped = Mutex::new(Vec::new());

        std::thread::scope(|s| {
            for _ in 0..16 {
                s.spawn(|| {
                    while let Some(url) = backlog.pop() {
                        popped.lock().unwrap().push(url);
                    }
                });
            }
        });

        let popped = popped.into_inner().unwrap();
        assert_eq!(popped.len(), 1000);
        let unique: HashSet<_> = popped.into_iter().collect();
        assert_eq!(unique.len(), 1000);
    }
}
