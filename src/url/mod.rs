//! URL handling module for Sitemap-Harvest
//!
//! Every page URL flowing through the harvester is a [`PageUrl`]: validated
//! once when it leaves the sitemap resolver and immutable afterwards.

mod canonical;

pub use canonical::{canonicalize, PageUrl};
