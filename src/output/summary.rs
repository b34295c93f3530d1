//! Harvest summary
//!
//! Counts every outcome of one run and prints them.

use crate::harvester::{FetchOutcome, PoolReport};
use crate::sitemap::ResolvedSitemaps;
use crate::state::UrlState;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Totals of one harvest run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// SHA-256 of the configuration file the run used
    pub config_hash: String,

    /// Number of sitemaps attempted
    pub sitemaps_total: usize,

    /// Number of sitemaps skipped because they could not be fetched or parsed
    pub sitemaps_failed: usize,

    /// Distinct canonical URLs discovered across all sitemaps
    pub unique_urls: usize,

    /// Pages accepted and written
    pub pages_saved: usize,

    /// URLs skipped because they were already claimed
    pub duplicate_urls: usize,

    /// Pages skipped because their body was already accepted
    pub duplicate_content: usize,

    /// URLs whose single fetch attempt failed
    pub fetch_failures: usize,

    /// Accepted pages whose write failed
    pub write_failures: usize,

    /// URLs never claimed because the run was cancelled
    pub unscheduled: usize,

    /// Sitemaps that failed, with the reason
    pub failed_sitemaps: Vec<(String, String)>,

    /// Pages that failed to fetch or save, with the reason
    pub failed_urls: Vec<(String, String)>,
}

impl HarvestSummary {
    /// Summary of a run that fetched nothing
    pub fn empty(started_at: DateTime<Utc>, config_hash: impl Into<String>) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            config_hash: config_hash.into(),
            sitemaps_total: 0,
            sitemaps_failed: 0,
            unique_urls: 0,
            pages_saved: 0,
            duplicate_urls: 0,
            duplicate_content: 0,
            fetch_failures: 0,
            write_failures: 0,
            unscheduled: 0,
            failed_sitemaps: Vec::new(),
            failed_urls: Vec::new(),
        }
    }

    /// Builds the summary of a finished run
    ///
    /// # Arguments
    ///
    /// * `resolved` - What the sitemap resolver produced
    /// * `pool` - What the worker pool did with it
    /// * `started_at` - When the run began
    /// * `config_hash` - Hash of the configuration file
    pub fn from_run(
        resolved: &ResolvedSitemaps,
        pool: &PoolReport,
        started_at: DateTime<Utc>,
        config_hash: impl Into<String>,
    ) -> Self {
        let failed_sitemaps = resolved
            .failures
            .iter()
            .map(|(url, e)| (url.clone(), e.to_string()))
            .collect();

        let failed_urls = pool
            .reports
            .iter()
            .filter_map(|r| match (&r.outcome, &r.persist_error) {
                (FetchOutcome::FetchFailed { error }, _) => {
                    Some((r.url.to_string(), error.to_string()))
                }
                (_, Some(e)) => Some((r.url.to_string(), e.to_string())),
                _ => None,
            })
            .collect();

        Self {
            started_at,
            finished_at: Utc::now(),
            config_hash: config_hash.into(),
            sitemaps_total: resolved.sitemaps_total,
            sitemaps_failed: resolved.sitemaps_failed(),
            unique_urls: resolved.urls.iter().collect::<HashSet<_>>().len(),
            pages_saved: pool.saved(),
            duplicate_urls: pool.count(UrlState::DuplicateUrl),
            duplicate_content: pool.count(UrlState::DuplicateContent),
            fetch_failures: pool.count(UrlState::FetchFailed),
            write_failures: pool.write_failures(),
            unscheduled: pool.unscheduled,
            failed_sitemaps,
            failed_urls,
        }
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Total duplicates suppressed at either level
    pub fn duplicates_suppressed(&self) -> usize {
        self.duplicate_urls + self.duplicate_content
    }
}

/// Prints a summary to stdout
pub fn print_summary(summary: &HarvestSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Run:");
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!("  Duration: {}s", summary.duration_seconds());
    println!("  Config hash: {}", summary.config_hash);
    println!();

    println!("Sitemaps:");
    println!("  Total: {}", summary.sitemaps_total);
    println!("  Failed: {}", summary.sitemaps_failed);
    println!();

    println!("Pages:");
    println!("  Unique URLs discovered: {}", summary.unique_urls);
    println!("  Saved: {}", summary.pages_saved);
    println!("  Duplicate URLs: {}", summary.duplicate_urls);
    println!("  Duplicate content: {}", summary.duplicate_content);
    println!("  Fetch failures: {}", summary.fetch_failures);
    println!("  Write failures: {}", summary.write_failures);
    if summary.unscheduled > 0 {
        println!("  Not fetched (cancelled): {}", summary.unscheduled);
    }
    println!();

    if !summary.failed_sitemaps.is_empty() {
        println!("Failed Sitemaps ({}):", summary.failed_sitemaps.len());
        for (url, reason) in &summary.failed_sitemaps {
            println!("  - {}: {}", url, reason);
        }
        println!();
    }

    if !summary.failed_urls.is_empty() {
        println!("Failed Pages ({}):", summary.failed_urls.len());
        for (url, reason) in &summary.failed_urls {
            println!("  - {}: {}", url, reason);
        }
        println!();
    }

    println!(
        "{} pages saved, {} duplicates suppressed",
        summary.pages_saved,
        summary.duplicates_suppressed()
    );
}
