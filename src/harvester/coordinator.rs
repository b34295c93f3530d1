//! Harvest coordinator - main orchestration logic
//!
//! This module ties the stages of one harvest together:
//! - Resolving all configured sitemaps into a URL union
//! - Reporting URLs collapsed out of the union as duplicates
//! - Draining the union with the worker pool
//! - Producing the final summary

use crate::config::Config;
use crate::dedup::DedupIndex;
use crate::harvester::{
    build_http_client, FetchOutcome, PoolReport, PoolSettings, UrlReport, WorkerPool,
};
use crate::output::HarvestSummary;
use crate::sitemap::{ResolvedSitemaps, SitemapResolver};
use crate::state::{UrlState, UrlTracker};
use crate::storage::{FsSink, PageSink};
use crate::url::PageUrl;
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything one harvest produced
#[derive(Debug)]
pub struct HarvestReport {
    pub summary: HarvestSummary,
    pub resolved: ResolvedSitemaps,
    pub pool: PoolReport,
}

/// Runs harvests for one configuration
pub struct Harvester {
    config: Arc<Config>,
    config_hash: String,
    client: Client,
    sink: Arc<dyn PageSink>,
    cancel: CancellationToken,
}

impl Harvester {
    /// Creates a harvester writing into the configured pages directory
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    /// * `config_hash` - Hash of the configuration file, carried into summaries
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: Config, config_hash: impl Into<String>) -> crate::Result<Self> {
        let client = build_http_client(&config.user_agent)?;
        let sink: Arc<dyn PageSink> = Arc::new(FsSink::new(&config.output.pages_dir));

        Ok(Self {
            config: Arc::new(config),
            config_hash: config_hash.into(),
            client,
            sink,
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the sink accepted pages are written to
    pub fn with_sink(mut self, sink: Arc<dyn PageSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Token that stops the run from claiming further URLs once cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs one harvest and returns its summary
    pub async fn run(&self) -> HarvestSummary {
        self.run_with_reports().await.summary
    }

    /// Runs one harvest and returns the summary with every per-URL report
    ///
    /// Each run starts from an empty dedup index. Failures of single
    /// sitemaps, fetches or writes are counted, never returned.
    pub async fn run_with_reports(&self) -> HarvestReport {
        let started_at = Utc::now();
        let harvester_config = &self.config.harvester;

        if self.config.sitemaps.is_empty() {
            tracing::warn!("No sitemaps configured, nothing to harvest");
            return HarvestReport {
                summary: HarvestSummary::empty(started_at, self.config_hash.clone()),
                resolved: ResolvedSitemaps::default(),
                pool: PoolReport::default(),
            };
        }

        tracing::info!("Resolving {} sitemaps", self.config.sitemaps.len());
        let resolver = SitemapResolver::new(
            self.client.clone(),
            harvester_config.sitemap_timeout(),
            harvester_config.max_sitemap_depth,
        );
        let resolved = resolver
            .resolve_all(&self.config.sitemaps, harvester_config.collapse_duplicates)
            .await;

        tracing::info!(
            "Resolved {} of {} sitemaps into {} unique URLs",
            resolved.sitemaps_resolved,
            resolved.sitemaps_total,
            resolved.urls.len()
        );

        let mut pool_report = if resolved.urls.is_empty() {
            tracing::warn!("Sitemaps yielded no URLs, nothing to fetch");
            PoolReport::default()
        } else {
            let pool = WorkerPool::new(
                self.client.clone(),
                Arc::new(DedupIndex::new()),
                Arc::clone(&self.sink),
                PoolSettings::from_config(harvester_config, &self.config.output),
            )
            .with_cancellation(self.cancel.clone());
            pool.run(resolved.urls.clone()).await
        };

        pool_report
            .reports
            .extend(resolved.collapsed.iter().cloned().map(collapsed_report));

        let summary =
            HarvestSummary::from_run(&resolved, &pool_report, started_at, self.config_hash.clone());

        tracing::info!(
            "Harvest finished: {} saved, {} duplicate URLs, {} duplicate content, {} failed",
            summary.pages_saved,
            summary.duplicate_urls,
            summary.duplicate_content,
            summary.fetch_failures
        );

        HarvestReport {
            summary,
            resolved,
            pool: pool_report,
        }
    }
}

fn collapsed_report(url: PageUrl) -> UrlReport {
    let mut tracker = UrlTracker::new(&url);
    if let Err(e) = tracker.advance(UrlState::DuplicateUrl) {
        tracing::error!("{}", e);
    }
    tracing::debug!("Duplicate URL {} (listed more than once)", url);
    UrlReport::new(url, FetchOutcome::DuplicateUrl)
}
