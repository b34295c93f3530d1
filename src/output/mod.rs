//! Output module for harvest summaries
//!
//! This module handles:
//! - Counting per-URL outcomes into a run summary
//! - Printing the summary for the operator

mod summary;

pub use summary::{print_summary, HarvestSummary};
