//! Extraction and page generation for saved pages
//!
//! This module handles:
//! - Extracting a structured record from one saved page
//! - Rendering a record back into a standalone HTML page
//! - Batch rendering of a whole pages directory

mod record;
mod render;

pub use record::{extract_page_record, DownloadGroup, PageRecord};
pub use render::{render_directory, render_page};

use thiserror::Error;

/// Errors from extraction and rendering
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector {0}")]
    Selector(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
