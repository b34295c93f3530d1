//! Bounded fetch worker pool
//!
//! This module handles:
//! - Spawning a fixed number of workers that drain a shared backlog
//! - Claiming each URL in the dedup index before fetching it
//! - Accepting or rejecting bodies by content digest
//! - Handing accepted bodies to the sink on the blocking thread pool
//! - Best-effort cancellation between URLs

use crate::config::{HarvesterConfig, OutputConfig};
use crate::dedup::{ContentDigest, DedupIndex};
use crate::harvester::{fetch_body, Backlog, FetchOutcome, PoolReport, UrlReport};
use crate::state::{UrlState, UrlTracker};
use crate::storage::{PageSink, PersistenceError, StorageKey};
use crate::url::PageUrl;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Tunables for one pool run
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Upper bound on concurrent workers
    pub workers: usize,

    /// Timeout for each page GET
    pub request_timeout: Duration,

    /// Suffix for derived storage keys
    pub extension: String,
}

impl PoolSettings {
    /// Builds pool settings from the harvester and output sections
    pub fn from_config(harvester: &HarvesterConfig, output: &OutputConfig) -> Self {
        Self {
            workers: harvester.workers as usize,
            request_timeout: harvester.request_timeout(),
            extension: output.extension.clone(),
        }
    }
}

/// Fetches every URL of a backlog with a bounded number of workers
///
/// The dedup index is shared by all workers and may be shared with the
/// caller, so a second run over the same index skips everything already seen.
#[derive(Clone)]
pub struct WorkerPool {
    client: Client,
    index: Arc<DedupIndex>,
    sink: Arc<dyn PageSink>,
    settings: Arc<PoolSettings>,
    cancel: CancellationToken,
}

impl WorkerPool {
    /// Creates a pool
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `index` - Dedup index consulted for every URL and body
    /// * `sink` - Destination for accepted bodies
    /// * `settings` - Worker count, request timeout and key extension
    pub fn new(
        client: Client,
        index: Arc<DedupIndex>,
        sink: Arc<dyn PageSink>,
        settings: PoolSettings,
    ) -> Self {
        Self {
            client,
            index,
            sink,
            settings: Arc::new(settings),
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the pool's cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops workers from claiming further URLs once cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The dedup index shared by the workers
    pub fn index(&self) -> &DedupIndex {
        &self.index
    }

    /// Runs the pool until the backlog is drained or the run is cancelled
    ///
    /// Spawns `min(workers, backlog)` workers and waits for all of them. Every
    /// URL taken from the backlog yields exactly one `UrlReport`; URLs still
    /// waiting after cancellation are counted as unscheduled.
    pub async fn run(&self, urls: Vec<PageUrl>) -> PoolReport {
        let backlog = Arc::new(Backlog::new(urls));
        let worker_count = self.settings.workers.min(backlog.len());

        tracing::info!(
            "Starting {} workers for {} URLs",
            worker_count,
            backlog.len()
        );

        let mut tasks = JoinSet::new();
        for worker_id in 0..worker_count {
            let pool = self.clone();
            let backlog = Arc::clone(&backlog);
            tasks.spawn(async move { pool.work(worker_id, &backlog).await });
        }

        let mut report = PoolReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(reports) => report.reports.extend(reports),
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }

        report.unscheduled = backlog.len();
        if report.unscheduled > 0 {
            tracing::warn!(
                "Run cancelled with {} URLs never claimed",
                report.unscheduled
            );
        }
        report
    }

    async fn work(&self, worker_id: usize, backlog: &Backlog) -> Vec<UrlReport> {
        let mut reports = Vec::new();

        loop {
            if self.cancel.is_cancelled() {
                tracing::debug!("Worker {} stopping: cancelled", worker_id);
                break;
            }
            let Some(url) = backlog.pop() else {
                break;
            };

            let (outcome, persist_error) = self.process(&url).await;
            reports.push(UrlReport {
                url,
                outcome,
                persist_error,
            });
        }

        tracing::debug!("Worker {} done after {} URLs", worker_id, reports.len());
        reports
    }

    async fn process(&self, url: &PageUrl) -> (FetchOutcome, Option<PersistenceError>) {
        let mut tracker = UrlTracker::new(url);

        if !self.index.admit_url(url) {
            step(&mut tracker, UrlState::DuplicateUrl);
            tracing::debug!("Duplicate URL {}", url);
            return (FetchOutcome::DuplicateUrl, None);
        }
        step(&mut tracker, UrlState::Claimed);

        let body = match fetch_body(&self.client, url.as_str(), self.settings.request_timeout).await
        {
            Ok(body) => body,
            Err(error) => {
                step(&mut tracker, UrlState::FetchFailed);
                tracing::warn!("Failed to fetch {}: {}", url, error);
                return (FetchOutcome::FetchFailed { error }, None);
            }
        };
        step(&mut tracker, UrlState::Fetched);

        let digest = ContentDigest::compute(&body);
        if !self.index.admit_digest(digest) {
            step(&mut tracker, UrlState::DuplicateContent);
            tracing::debug!("Duplicate content at {} ({})", url, digest);
            return (FetchOutcome::DuplicateContent { digest }, None);
        }
        step(&mut tracker, UrlState::Accepted);

        let storage_key = StorageKey::derive(url, &self.settings.extension);
        let bytes = body.len();
        let persist_error = self.persist(storage_key.clone(), body).await.err();

        match &persist_error {
            None => tracing::info!("Saved {} as {} ({} bytes)", url, storage_key, bytes),
            Some(e) => tracing::warn!("Accepted {} but could not save it: {}", url, e),
        }

        let outcome = FetchOutcome::Accepted {
            storage_key,
            digest,
            bytes,
        };
        (outcome, persist_error)
    }

    async fn persist(&self, key: StorageKey, body: Vec<u8>) -> Result<(), PersistenceError> {
        let sink = Arc::clone(&self.sink);
        tokio::task::spawn_blocking(move || sink.write(&key, &body))
            .await
            .map_err(|e| PersistenceError::Task(e.to_string()))?
    }
}

fn step(tracker: &mut UrlTracker<'_>, next: UrlState) {
    if let Err(e) = tracker.advance(next) {
        tracing::error!("{}", e);
    }
}
