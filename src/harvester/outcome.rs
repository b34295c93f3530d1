//! Per-URL outcomes of a harvest

use crate::dedup::ContentDigest;
use crate::harvester::FetchError;
use crate::state::UrlState;
use crate::storage::{PersistenceError, StorageKey};
use crate::url::PageUrl;
use std::collections::BTreeSet;

/// What happened to one URL taken from the backlog
///
/// Exactly one variant applies per attempted URL.
#[derive(Debug)]
pub enum FetchOutcome {
    /// New content, handed to the sink under `storage_key`
    Accepted {
        storage_key: StorageKey,
        digest: ContentDigest,
        bytes: usize,
    },

    /// URL was already admitted; no request was made
    DuplicateUrl,

    /// Body matched content already accepted under another URL
    DuplicateContent { digest: ContentDigest },

    /// Single fetch attempt failed; nothing was written
    FetchFailed { error: FetchError },
}

impl FetchOutcome {
    /// Terminal state this outcome corresponds to
    pub fn state(&self) -> UrlState {
        match self {
            Self::Accepted { .. } => UrlState::Accepted,
            Self::DuplicateUrl => UrlState::DuplicateUrl,
            Self::DuplicateContent { .. } => UrlState::DuplicateContent,
            Self::FetchFailed { .. } => UrlState::FetchFailed,
        }
    }
}

/// Outcome of one URL plus the result of persisting it
#[derive(Debug)]
pub struct UrlReport {
    pub url: PageUrl,
    pub outcome: FetchOutcome,
    /// Set only for an `Accepted` outcome whose write failed
    pub persist_error: Option<PersistenceError>,
}

impl UrlReport {
    pub fn new(url: PageUrl, outcome: FetchOutcome) -> Self {
        Self {
            url,
            outcome,
            persist_error: None,
        }
    }

    /// Returns true if the page was accepted and written
    pub fn is_saved(&self) -> bool {
        self.outcome.state().is_success() && self.persist_error.is_none()
    }
}

/// Everything the worker pool did in one run
#[derive(Debug, Default)]
pub struct PoolReport {
    /// One report per URL taken from the backlog, in completion order
    pub reports: Vec<UrlReport>,

    /// URLs left in the backlog because the run was cancelled
    pub unscheduled: usize,
}

impl PoolReport {
    /// Number of reports whose outcome ended in `state`
    pub fn count(&self, state: UrlState) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.state() == state)
            .count()
    }

    /// Number of accepted pages that were written successfully
    pub fn saved(&self) -> usize {
        self.reports.iter().filter(|r| r.is_saved()).count()
    }

    /// Number of accepted pages whose write failed
    pub fn write_failures(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.persist_error.is_some())
            .count()
    }

    /// Storage keys of every accepted page
    pub fn accepted_keys(&self) -> BTreeSet<StorageKey> {
        self.reports
            .iter()
            .filter_map(|r| match &r.outcome {
                FetchOutcome::Accepted { storage_key, .. } => Some(storage_key.clone()),
                _ => None,
            })
            .collect()
    }
}
