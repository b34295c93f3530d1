//! Sitemap resolver
//!
//! Turns configured sitemap URLs into the union of page URLs they list.
//! A failing sitemap is reported and skipped; it never fails the run.

use crate::harvester::fetch_body;
use crate::sitemap::{parse_sitemap, SitemapDocument, SitemapError};
use crate::url::PageUrl;
use reqwest::Client;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::task::JoinSet;

type ResolveFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<PageUrl>, SitemapError>> + Send + 'a>>;

/// Fetches and parses sitemap documents
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    client: Client,
    timeout: Duration,
    max_depth: u8,
}

/// Outcome of resolving every configured sitemap
#[derive(Debug, Default)]
pub struct ResolvedSitemaps {
    /// Unique page URLs in first-seen order
    pub urls: Vec<PageUrl>,

    /// Repeated occurrences removed before scheduling
    pub collapsed: Vec<PageUrl>,

    /// Sitemaps that could not be used, with the reason
    pub failures: Vec<(String, SitemapError)>,

    /// Number of sitemaps attempted
    pub sitemaps_total: usize,

    /// Number of sitemaps that resolved successfully
    pub sitemaps_resolved: usize,
}

impl ResolvedSitemaps {
    /// Number of sitemaps that did not resolve
    pub fn sitemaps_failed(&self) -> usize {
        self.sitemaps_total - self.sitemaps_resolved
    }
}

impl SitemapResolver {
    /// Creates a resolver
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `timeout` - Bound on each sitemap GET
    /// * `max_depth` - How many levels of sitemap index documents to follow
    pub fn new(client: Client, timeout: Duration, max_depth: u8) -> Self {
        Self {
            client,
            timeout,
            max_depth,
        }
    }

    /// Resolves one sitemap into its page URLs
    ///
    /// Locations that are not absolute http(s) URLs are skipped with a
    /// warning. Index documents are followed up to the configured depth; a
    /// failing child sitemap is skipped.
    pub async fn resolve(&self, sitemap_url: &str) -> Result<Vec<PageUrl>, SitemapError> {
        self.resolve_at_depth(sitemap_url.to_string(), 0).await
    }

    fn resolve_at_depth(&self, url: String, depth: u8) -> ResolveFuture<'_> {
        Box::pin(async move {
            tracing::debug!("Fetching sitemap {} (depth {})", url, depth);

            let body = fetch_body(&self.client, &url, self.timeout)
                .await
                .map_err(|source| SitemapError::Fetch {
                    url: url.clone(),
                    source,
                })?;

            let xml = String::from_utf8_lossy(&body);
            let document = parse_sitemap(&xml).map_err(|message| SitemapError::Parse {
                url: url.clone(),
                message,
            })?;

            match document {
                SitemapDocument::UrlSet(locations) => Ok(to_page_urls(&url, locations)),
                SitemapDocument::Index(children) => {
                    if depth >= self.max_depth {
                        return Err(SitemapError::DepthExceeded { url });
                    }

                    tracing::debug!("Sitemap index {} lists {} children", url, children.len());

                    let mut urls = Vec::new();
                    for child in children {
                        match self.resolve_at_depth(child.clone(), depth + 1).await {
                            Ok(child_urls) => urls.extend(child_urls),
                            Err(e) => tracing::warn!("Skipping child sitemap {}: {}", child, e),
                        }
                    }
                    Ok(urls)
                }
            }
        })
    }

    /// Resolves every sitemap concurrently and merges the results
    ///
    /// Results are merged in the order the sitemaps were given, so the union
    /// is deterministic for a given set of responses.
    ///
    /// # Arguments
    ///
    /// * `sitemaps` - Sitemap document URLs
    /// * `collapse` - Drop repeated URLs from the union (they are returned in
    ///   `collapsed` instead)
    pub async fn resolve_all(&self, sitemaps: &[String], collapse: bool) -> ResolvedSitemaps {
        let mut tasks = JoinSet::new();
        for (position, sitemap) in sitemaps.iter().enumerate() {
            let resolver = self.clone();
            let sitemap = sitemap.clone();
            tasks.spawn(async move {
                let result = resolver.resolve(&sitemap).await;
                (position, sitemap, result)
            });
        }

        let mut results = Vec::with_capacity(sitemaps.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!("Sitemap task failed: {}", e),
            }
        }
        results.sort_by_key(|(position, _, _)| *position);

        let mut resolved = ResolvedSitemaps {
            sitemaps_total: sitemaps.len(),
            ..Default::default()
        };
        let mut per_sitemap = Vec::new();

        for (_, sitemap, result) in results {
            match result {
                Ok(urls) => {
                    tracing::info!("Sitemap {} lists {} URLs", sitemap, urls.len());
                    resolved.sitemaps_resolved += 1;
                    per_sitemap.push(urls);
                }
                Err(e) => {
                    tracing::warn!("Skipping sitemap {}: {}", sitemap, e);
                    resolved.failures.push((sitemap, e));
                }
            }
        }

        let (urls, collapsed) = union_urls(per_sitemap, collapse);
        resolved.urls = urls;
        resolved.collapsed = collapsed;
        resolved
    }
}

/// Merges per-sitemap URL lists
///
/// # Returns
///
/// `(urls, collapsed)`. With `collapse`, `urls` holds each canonical URL once
/// in first-seen order and `collapsed` every later repeat. Without it, `urls`
/// is the plain concatenation and `collapsed` is empty.
pub fn union_urls(per_sitemap: Vec<Vec<PageUrl>>, collapse: bool) -> (Vec<PageUrl>, Vec<PageUrl>) {
    let all = per_sitemap.into_iter().flatten();
    if !collapse {
        return (all.collect(), Vec::new());
    }

    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    let mut collapsed = Vec::new();
    for url in all {
        if seen.insert(url.clone()) {
            urls.push(url);
        } else {
            collapsed.push(url);
        }
    }
    (urls, collapsed)
}

fn to_page_urls(sitemap: &str, locations: Vec<String>) -> Vec<PageUrl> {
    locations
        .into_iter()
        .filter_map(|loc| match PageUrl::parse(&loc) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Skipping location '{}' in {}: {}", loc, sitemap, e);
                None
            }
        })
        .collect()
}
