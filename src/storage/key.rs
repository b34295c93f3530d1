use crate::url::PageUrl;
use std::fmt;

/// Character substituted for every path separator
const FLATTEN_CHAR: char = '_';

/// Flat file name under which an accepted page is stored
///
/// Derived deterministically from the URL's path component. Flattening is
/// lossy: distinct URLs may share a key, in which case the last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    /// Derives the storage key for a page URL
    ///
    /// Every `/` in the path is replaced with `_` and `.{extension}` is
    /// appended. Query string and fragment do not contribute.
    ///
    /// # Example
    ///
    /// ```
    /// use sitemap_harvest::{PageUrl, StorageKey};
    ///
    /// let url = PageUrl::parse("https://example.com/movies/inception/").unwrap();
    /// assert_eq!(StorageKey::derive(&url, "html").as_str(), "_movies_inception.html");
    /// ```
    pub fn derive(url: &PageUrl, extension: &str) -> Self {
        let flattened = url.path().replace('/', &FLATTEN_CHAR.to_string());
        Self(format!("{flattened}.{extension}"))
    }

    /// Returns the key as a file name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
