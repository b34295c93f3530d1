//! Sitemap XML parser
//!
//! Only `<loc>` elements that are direct children of a `<url>` (or, in an
//! index, a `<sitemap>`) entry in the standard sitemap namespace are
//! collected. Extension elements such as `<image:loc>` are skipped.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// The standard sitemap protocol namespace
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: page locations, in document order
    UrlSet(Vec<String>),

    /// `<sitemapindex>`: child sitemap locations, in document order
    Index(Vec<String>),
}

impl SitemapDocument {
    /// Returns the contained locations regardless of document kind
    pub fn locations(&self) -> &[String] {
        match self {
            Self::UrlSet(locs) | Self::Index(locs) => locs,
        }
    }
}

/// Where the reader currently is in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    UrlSet,
    SitemapIndex,
    Entry,
    Loc,
    Other,
}

/// Parses a sitemap document
///
/// # Returns
///
/// * `Ok(SitemapDocument)` - The document kind and its locations
/// * `Err(String)` - Malformed XML, or a root element other than
///   `urlset`/`sitemapindex`
///
/// # Example
///
/// ```
/// use sitemap_harvest::sitemap::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/movie</loc></url>
/// </urlset>"#;
///
/// let doc = parse_sitemap(xml).unwrap();
/// assert_eq!(doc, SitemapDocument::UrlSet(vec!["https://example.com/movie".to_string()]));
/// ```
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, String> {
    let mut reader = NsReader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut locations = Vec::new();
    let mut current_loc: Option<String> = None;

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let element = classify(stack.last().copied(), in_sitemap_namespace(&ns), &name)?;
                if stack.is_empty() {
                    root = Some(element);
                }
                if element == Element::Loc {
                    current_loc = Some(String::new());
                }
                stack.push(element);
            }
            Ok((ns, Event::Empty(e))) => {
                // Self-closing elements carry no text; only a root matters
                if stack.is_empty() && root.is_none() {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    root = Some(classify(None, in_sitemap_namespace(&ns), &name)?);
                }
            }
            Ok((_, Event::End(_))) => {
                if stack.pop() == Some(Element::Loc) {
                    if let Some(text) = current_loc.take() {
                        let text = text.trim();
                        if !text.is_empty() {
                            locations.push(text.to_string());
                        }
                    }
                }
            }
            Ok((_, Event::Text(t))) => {
                if let (Some(Element::Loc), Some(loc)) = (stack.last(), current_loc.as_mut()) {
                    let text = t.unescape().map_err(|e| e.to_string())?;
                    loc.push_str(&text);
                }
            }
            Ok((_, Event::CData(c))) => {
                if let (Some(Element::Loc), Some(loc)) = (stack.last(), current_loc.as_mut()) {
                    loc.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(format!("XML parse error: {}", e)),
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err("Unexpected end of document".to_string());
    }

    match root {
        Some(Element::UrlSet) => Ok(SitemapDocument::UrlSet(locations)),
        Some(Element::SitemapIndex) => Ok(SitemapDocument::Index(locations)),
        _ => Err("Document has no root element".to_string()),
    }
}

fn in_sitemap_namespace(ns: &ResolveResult) -> bool {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => *uri == SITEMAP_NAMESPACE.as_bytes(),
        ResolveResult::Unbound => true,
        ResolveResult::Unknown(_) => false,
    }
}

fn classify(parent: Option<Element>, in_ns: bool, name: &str) -> Result<Element, String> {
    let element = match (parent, in_ns, name) {
        (None, true, "urlset") => Element::UrlSet,
        (None, true, "sitemapindex") => Element::SitemapIndex,
        (None, _, other) => return Err(format!("Unexpected root element <{}>", other)),
        (Some(Element::UrlSet), true, "url") => Element::Entry,
        (Some(Element::SitemapIndex), true, "sitemap") => Element::Entry,
        (Some(Element::Entry), true, "loc") => Element::Loc,
        _ => Element::Other,
    };
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com/movie-one/</loc>
    <lastmod>2024-01-15</lastmod>
  </url>
  <url>
    <loc>
      https://example.com/movie-two/
    </loc>
  </url>
</urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec![
                "https://example.com/movie-one/".to_string(),
                "https://example.com/movie-two/".to_string(),
            ])
        );
    }

    #[test]
    fn test_parse_without_namespace() {
        let xml = r#"<urlset><url><loc>https://example.com/a</loc></url></urlset>"#;
        assert_eq!(parse_sitemap(xml).unwrap().locations(), ["https://example.com/a"]);
    }

    #[test]
    fn test_prefixed_namespace() {
        let xml = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sm:url><sm:loc>https://example.com/a</sm:loc></sm:url>
</sm:urlset>"#;
        assert_eq!(parse_sitemap(xml).unwrap().locations(), ["https://example.com/a"]);
    }

    #[test]
    fn test_image_loc_ignored() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
  <url>
    <loc>https://example.com/movie</loc>
    <image:image>
      <image:loc>https://example.com/wp-content/poster.jpg</image:loc>
    </image:image>
  </url>
</urlset>"#;
        assert_eq!(parse_sitemap(xml).unwrap().locations(), ["https://example.com/movie"]);
    }

    #[test]
    fn test_foreign_namespace_loc_ignored() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:x="urn:other">
  <url><x:loc>https://example.com/not-this</x:loc><loc>https://example.com/this</loc></url>
</urlset>"#;
        assert_eq!(parse_sitemap(xml).unwrap().locations(), ["https://example.com/this"]);
    }

    #[test]
    fn test_loc_outside_url_ignored() {
        let xml = r#"<urlset><loc>https://example.com/stray</loc><url><loc>https://example.com/a</loc></url></urlset>"#;
        assert_eq!(parse_sitemap(xml).unwrap().locations(), ["https://example.com/a"]);
    }

    #[test]
    fn test_escaped_entities() {
        let xml = r#"<urlset><url><loc>https://example.com/search?a=1&amp;b=2</loc></url></urlset>"#;
        assert_eq!(
            parse_sitemap(xml).unwrap().locations(),
            ["https://example.com/search?a=1&b=2"]
        );
    }

    #[test]
    fn test_cdata_loc() {
        let xml = r#"<urlset><url><loc><![CDATA[https://example.com/cdata]]></loc></url></urlset>"#;
        assert_eq!(parse_sitemap(xml).unwrap().locations(), ["https://example.com/cdata"]);
    }

    #[test]
    fn test_empty_loc_skipped() {
        let xml = r#"<urlset><url><loc>  </loc></url><url><loc/></url></urlset>"#;
        assert!(parse_sitemap(xml).unwrap().locations().is_empty());
    }

    #[test]
    fn test_empty_urlset() {
        assert_eq!(
            parse_sitemap(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"/>"#)
                .unwrap(),
            SitemapDocument::UrlSet(vec![])
        );
    }

    #[test]
    fn test_parse_index() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://example.com/post-sitemap.xml</loc></sitemap>
  <sitemap><loc>https://example.com/page-sitemap.xml</loc></sitemap>
</sitemapindex>"#;
        assert_eq!(
            parse_sitemap(xml).unwrap(),
            SitemapDocument::Index(vec![
                "https://example.com/post-sitemap.xml".to_string(),
                "https://example.com/page-sitemap.xml".to_string(),
            ])
        );
    }

    #[test]
    fn test_html_document_rejected() {
        let result = parse_sitemap("<html><body>Not found</body></html>");
        assert!(result.unwrap_err().contains("<html>"));
    }

    #[test]
    fn test_wrong_namespace_root_rejected() {
        assert!(parse_sitemap(r#"<urlset xmlns="urn:not-sitemaps"></urlset>"#).is_err());
    }

    #[test]
    fn test_empty_document_rejected() {
        assert!(parse_sitemap("").is_err());
    }

    #[test]
    fn test_malformed_xml_rejected() {
        assert!(parse_sitemap("<urlset><url><loc>https://example.com/a</url></urlset>").is_err());
    }

    #[test]
    fn test_truncated_document_rejected() {
        assert!(parse_sitemap("<urlset><url><loc>https://example.com/a</loc>").is_err());
    }
}
