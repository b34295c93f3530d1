//! Harvester module - fetching and orchestration
//!
//! This module contains the worker pool that drains the URL backlog and the
//! coordinator that runs a whole harvest from sitemaps to summary.

mod backlog;
mod coordinator;
mod fetcher;
mod outcome;
mod pool;

pub use backlog::Backlog;
pub use coordinator::{HarvestReport, Harvester};
pub use fetcher::{build_http_client, fetch_body, FetchError};
pub use outcome::{FetchOutcome, PoolReport, UrlReport};
pub use pool::{PoolSettings, WorkerPool};
