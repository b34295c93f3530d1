//! Page record extraction
//!
//! Pulls the title, poster image, detail list, screenshots and download
//! groups out of a saved page.

use crate::extract::ExtractError;
use scraper::{ElementRef, Html, Selector};

/// Structured fields extracted from one saved page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRecord {
    /// `<title>` text, or `"No Title"`
    pub title: String,

    /// `og:image` meta content, or empty
    pub og_image: String,

    /// Key/value pairs from the first `<ul>`, in first-seen key order
    pub details: Vec<(String, String)>,

    /// Image sources in document order
    pub screenshots: Vec<String>,

    /// Download groups that have at least one link
    pub downloads: Vec<DownloadGroup>,
}

/// A version heading and the links listed under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadGroup {
    pub version: String,
    /// `(link text, href)` pairs
    pub links: Vec<(String, String)>,
}

impl PageRecord {
    /// Looks up a detail value by key
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set_detail(&mut self, key: String, value: String) {
        match self.details.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.details.push((key, value)),
        }
    }
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector(format!("{css}: {e:?}")))
}

/// Text of an element with every text node trimmed and empty ones dropped
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

fn non_empty_attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).filter(|v| !v.is_empty())
}

/// Extracts a page record from raw HTML
///
/// # Extraction Rules
///
/// - **title**: trimmed `<title>` text, `"No Title"` when there is none
/// - **og_image**: `content` of `<meta property="og:image">`
/// - **details**: each `<li>` of the first `<ul>` that has a `<strong>` and a
///   colon; the strong text (minus trailing colons) is the key, the rest of
///   the item is the value
/// - **screenshots**: every `<img>`'s `src`, or `data-src` when `src` is empty
/// - **downloads**: each `<h5>` with the next sibling `<p>`'s `<a href>` links
///
/// # Example
///
/// ```
/// use sitemap_harvest::extract::extract_page_record;
///
/// let html = r#"<html><head><title> Inception </title></head>
/// <body><ul><li><strong>Year:</strong> 2010</li></ul></body></html>"#;
///
/// let record = extract_page_record(html).unwrap();
/// assert_eq!(record.title, "Inception");
/// assert_eq!(record.detail("Year"), Some("2010"));
/// ```
pub fn extract_page_record(html: &str) -> Result<PageRecord, ExtractError> {
    let document = Html::parse_document(html);
    let mut record = PageRecord {
        title: extract_title(&document)?,
        og_image: extract_og_image(&document)?,
        ..Default::default()
    };

    extract_details(&document, &mut record)?;
    record.screenshots = extract_screenshots(&document)?;
    record.downloads = extract_downloads(&document)?;

    Ok(record)
}

fn extract_title(document: &Html) -> Result<String, ExtractError> {
    let title = document
        .select(&selector("title")?)
        .next()
        .map(stripped_text)
        .unwrap_or_else(|| "No Title".to_string());
    Ok(title)
}

fn extract_og_image(document: &Html) -> Result<String, ExtractError> {
    let og_image = document
        .select(&selector(r#"meta[property="og:image"]"#)?)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or_default()
        .to_string();
    Ok(og_image)
}

fn extract_details(document: &Html, record: &mut PageRecord) -> Result<(), ExtractError> {
    let Some(list) = document.select(&selector("ul")?).next() else {
        return Ok(());
    };

    let li = selector("li")?;
    let strong = selector("strong")?;

    for item in list.select(&li) {
        let Some(label) = item.select(&strong).next() else {
            continue;
        };
        let raw_text: String = item.text().collect();
        if !raw_text.contains(':') {
            continue;
        }

        let key = stripped_text(label).trim_end_matches(':').to_string();
        let label_text: String = label.text().collect();
        let value = stripped_text(item)
            .replace(&label_text, "")
            .trim_start_matches([':', ' '])
            .trim()
            .to_string();

        record.set_detail(key, value);
    }
    Ok(())
}

fn extract_screenshots(document: &Html) -> Result<Vec<String>, ExtractError> {
    let screenshots = document
        .select(&selector("img")?)
        .filter_map(|img| {
            non_empty_attr(img, "src").or_else(|| non_empty_attr(img, "data-src"))
        })
        .map(str::to_string)
        .collect();
    Ok(screenshots)
}

fn extract_downloads(document: &Html) -> Result<Vec<DownloadGroup>, ExtractError> {
    let anchor = selector("a")?;
    let mut downloads = Vec::new();

    for heading in document.select(&selector("h5")?) {
        let paragraph = heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "p");
        let Some(paragraph) = paragraph else {
            continue;
        };

        let links: Vec<(String, String)> = paragraph
            .select(&anchor)
            .filter_map(|a| {
                non_empty_attr(a, "href").map(|href| (stripped_text(a), href.to_string()))
            })
            .collect();

        if !links.is_empty() {
            downloads.push(DownloadGroup {
                version: stripped_text(heading),
                links,
            });
        }
    }
    Ok(downloads)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>
    Inception (2010) Full Movie
  </title>
  <meta property="og:image" content="https://example.com/poster.jpg">
</head>
<body>
  <ul>
    <li><strong>Full Name:</strong> Inception</li>
    <li><strong>Language:</strong> English</li>
    <li>Plain item without a label</li>
    <li><strong>Note</strong> no colon here</li>
    <li><strong>Language:</strong> Hindi</li>
  </ul>
  <ul><li><strong>Ignored:</strong> second list</li></ul>
  <img src="https://example.com/shot1.jpg">
  <img src="" data-src="https://example.com/lazy.jpg">
  <img data-src="https://example.com/lazy2.jpg">
  <img alt="no source">
  <h5>480p</h5>
  <div>spacer</div>
  <p><a href="https://dl.example.com/480">Download</a> <a>No href</a></p>
  <h5>720p</h5>
  <p><a href="https://dl.example.com/720a"> Mirror 1 </a><a href="https://dl.example.com/720b">Mirror 2</a></p>
  <h5>Trailer</h5>
  <p>No links here</p>
  <h5>Last</h5>
</body>
</html>"#;

    #[test]
    fn test_title() {
        let record = extract_page_record(MOVIE_PAGE).unwrap();
        assert_eq!(record.title, "Inception (2010) Full Movie");
    }

    #[test]
    fn test_missing_title_and_og_image() {
        let record = extract_page_record("<html><body><p>hi</p></body></html>").unwrap();
        assert_eq!(record.title, "No Title");
        assert_eq!(record.og_image, "");
        assert!(record.details.is_empty());
        assert!(record.screenshots.is_empty());
        assert!(record.downloads.is_empty());
    }

    #[test]
    fn test_og_image() {
        let record = extract_page_record(MOVIE_PAGE).unwrap();
        assert_eq!(record.og_image, "https://example.com/poster.jpg");
    }

    #[test]
    fn test_details_from_first_list_only() {
        let record = extract_page_record(MOVIE_PAGE).unwrap();
        assert_eq!(
            record.details,
            vec![
                ("Full Name".to_string(), "Inception".to_string()),
                ("Language".to_string(), "Hindi".to_string()),
            ]
        );
        assert_eq!(record.detail("Ignored"), None);
    }

    #[test]
    fn test_screenshots_fall_back_to_data_src() {
        let record = extract_page_record(MOVIE_PAGE).unwrap();
        assert_eq!(
            record.screenshots,
            vec![
                "https://example.com/shot1.jpg",
                "https://example.com/lazy.jpg",
                "https://example.com/lazy2.jpg",
            ]
        );
    }

    #[test]
    fn test_download_groups() {
        let record = extract_page_record(MOVIE_PAGE).unwrap();
        assert_eq!(
            record.downloads,
            vec![
                DownloadGroup {
                    version: "480p".to_string(),
                    links: vec![(
                        "Download".to_string(),
                        "https://dl.example.com/480".to_string()
                    )],
                },
                DownloadGroup {
                    version: "720p".to_string(),
                    links: vec![
                        (
                            "Mirror 1".to_string(),
                            "https://dl.example.com/720a".to_string()
                        ),
                        (
                            "Mirror 2".to_string(),
                            "https://dl.example.com/720b".to_string()
                        ),
                    ],
                },
            ]
        );
    }
}
