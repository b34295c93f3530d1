use crate::{UrlError, UrlResult};
use std::fmt;
use std::hash::{Hash, Hasher};
use url::Url;

/// Canonicalizes a raw URL string
///
/// Surrounding whitespace is trimmed and exactly one trailing `/` is removed.
/// Nothing else is rewritten: two URLs are the same page iff their canonical
/// strings are equal.
///
/// # Example
///
/// ```
/// use sitemap_harvest::url::canonicalize;
///
/// assert_eq!(canonicalize("https://example.com/movies/"), "https://example.com/movies");
/// assert_eq!(canonicalize("https://example.com/movies//"), "https://example.com/movies/");
/// ```
pub fn canonicalize(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_suffix('/').unwrap_or(trimmed)
}

/// A canonicalized, validated page URL
///
/// Equality and hashing use only the canonical string form.
#[derive(Debug, Clone)]
pub struct PageUrl {
    canonical: String,
    parsed: Url,
}

impl PageUrl {
    /// Parses and canonicalizes a raw URL
    ///
    /// # Returns
    ///
    /// * `Ok(PageUrl)` - The canonical URL
    /// * `Err(UrlError)` - Empty input, unparseable URL, or a scheme other than http/https
    pub fn parse(raw: &str) -> UrlResult<Self> {
        let canonical = canonicalize(raw);
        if canonical.is_empty() {
            return Err(UrlError::Empty);
        }

        let parsed =
            Url::parse(canonical).map_err(|e| UrlError::Parse(format!("{canonical}: {e}")))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(UrlError::UnsupportedScheme(other.to_string())),
        }

        Ok(Self {
            canonical: canonical.to_string(),
            parsed,
        })
    }

    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Returns the path component (`/` for a bare host)
    pub fn path(&self) -> &str {
        self.parsed.path()
    }
}

impl PartialEq for PageUrl {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for PageUrl {}

impl Hash for PageUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}
