//! Sitemap module for discovering page URLs
//!
//! This module handles:
//! - Parsing `<urlset>` and `<sitemapindex>` documents
//! - Fetching sitemaps (and nested index children) over HTTP
//! - Merging the results of many sitemaps into one schedulable union

mod parser;
mod resolver;

pub use parser::{parse_sitemap, SitemapDocument, SITEMAP_NAMESPACE};
pub use resolver::{union_urls, ResolvedSitemaps, SitemapResolver};

use crate::harvester::FetchError;
use thiserror::Error;

/// Errors that make one sitemap unusable
///
/// All of them are recoverable: the failing sitemap is skipped and the run
/// continues with the others.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Failed to fetch sitemap {url}: {source}")]
    Fetch { url: String, source: FetchError },

    #[error("Failed to parse sitemap {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Sitemap index nesting too deep at {url}")]
    DepthExceeded { url: String },
}
