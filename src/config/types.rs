use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sitemap-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Sitemap documents to resolve into page URLs
    #[serde(default)]
    pub sitemaps: Vec<String>,

    #[serde(default)]
    pub harvester: HarvesterConfig,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Worker pool and request behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvesterConfig {
    /// Number of concurrent fetch workers
    pub workers: u32,

    /// Timeout for a single page GET (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Timeout for a single sitemap GET (seconds)
    #[serde(rename = "sitemap-timeout")]
    pub sitemap_timeout: u64,

    /// Maximum nesting of sitemap index documents
    #[serde(rename = "max-sitemap-depth")]
    pub max_sitemap_depth: u8,

    /// Collapse repeated URLs across sitemaps before scheduling
    #[serde(rename = "collapse-duplicates")]
    pub collapse_duplicates: bool,
}

impl HarvesterConfig {
    /// Timeout applied to each page GET
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Timeout applied to each sitemap GET
    pub fn sitemap_timeout(&self) -> Duration {
        Duration::from_secs(self.sitemap_timeout)
    }
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            workers: 20,
            request_timeout: 10,
            sitemap_timeout: 30,
            max_sitemap_depth: 2,
            collapse_duplicates: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the harvester
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the harvester
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for harvester-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// `Name/Version (+ContactURL; ContactEmail)`, with the parenthesized part
    /// reduced to whatever contact details are configured.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        match (&self.contact_url, &self.contact_email) {
            (Some(url), Some(email)) => format!("{base} (+{url}; {email})"),
            (Some(url), None) => format!("{base} (+{url})"),
            (None, Some(email)) => format!("{base} ({email})"),
            (None, None) => base,
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory accepted pages are written into
    #[serde(rename = "pages-dir")]
    pub pages_dir: String,

    /// Extension appended to every storage key
    pub extension: String,

    /// Directory generated pages are written into by `--render`
    #[serde(rename = "rendered-dir")]
    pub rendered_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pages_dir: "posts".to_string(),
            extension: "html".to_string(),
            rendered_dir: "output".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_full() {
        let ua = UserAgentConfig {
            crawler_name: "MovieHarvester".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: Some("https://example.com/about".to_string()),
            contact_email: Some("admin@example.com".to_string()),
        };
        assert_eq!(
            ua.header_value(),
            "MovieHarvester/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_user_agent_without_contact() {
        let ua = UserAgentConfig {
            crawler_name: "MovieHarvester".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: None,
            contact_email: None,
        };
        assert_eq!(ua.header_value(), "MovieHarvester/1.0");
    }

    #[test]
    fn test_defaults_parse_from_minimal_toml() {
        let config: Config = toml::from_str(r#"sitemaps = ["https://example.com/sitemap.xml"]"#)
            .unwrap();
        assert_eq!(config.sitemaps.len(), 1);
        assert_eq!(config.harvester.workers, 20);
        assert_eq!(config.harvester.request_timeout(), Duration::from_secs(10));
        assert!(config.harvester.collapse_duplicates);
        assert_eq!(config.output.pages_dir, "posts");
        assert_eq!(config.output.extension, "html");
        assert_eq!(config.user_agent.crawler_name, "sitemap-harvest");
    }
}
