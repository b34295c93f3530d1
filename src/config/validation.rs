use crate::config::types::{Config, HarvesterConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent fetch workers
const MAX_WORKERS: u32 = 100;

/// Validates the entire configuration
///
/// An empty sitemap list is valid here; the harvester reports it at run time.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvester_config(&config.harvester)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_sitemaps(&config.sitemaps)?;
    Ok(())
}

/// Validates harvester configuration
fn validate_harvester_config(config: &HarvesterConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request-timeout must be at least 1 second".to_string(),
        ));
    }

    if config.sitemap_timeout < 1 {
        return Err(ConfigError::Validation(
            "sitemap-timeout must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    if let Some(contact_email) = &config.contact_email {
        validate_email(contact_email)?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.pages_dir.is_empty() {
        return Err(ConfigError::Validation(
            "pages-dir cannot be empty".to_string(),
        ));
    }

    if config.rendered_dir.is_empty() {
        return Err(ConfigError::Validation(
            "rendered-dir cannot be empty".to_string(),
        ));
    }

    let ext = &config.extension;
    if ext.is_empty() || ext.starts_with('.') || ext.contains('/') || ext.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "extension must be non-empty, without a leading dot or path separators, got '{}'",
            ext
        )));
    }

    Ok(())
}

/// Validates sitemap document URLs
fn validate_sitemaps(sitemaps: &[String]) -> Result<(), ConfigError> {
    for sitemap in sitemaps {
        let url = Url::parse(sitemap).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid sitemap URL '{}': {}", sitemap, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Sitemap URL '{}' must use http or https",
                sitemap
            )));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact-email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            sitemaps: vec!["https://example.com/sitemap.xml".to_string()],
            harvester: HarvesterConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_sitemaps_allowed() {
        let mut config = valid_config();
        config.sitemaps.clear();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_worker_bounds() {
        let mut config = valid_config();
        config.harvester.workers = 0;
        assert!(validate(&config).is_err());

        config.harvester.workers = 101;
        assert!(validate(&config).is_err());

        config.harvester.workers = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut config = valid_config();
        config.harvester.request_timeout = 0;
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.harvester.sitemap_timeout = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_sitemap_urls() {
        let mut config = valid_config();
        config.sitemaps.push("http://127.0.0.1:8080/sitemap.xml".to_string());
        assert!(validate(&config).is_ok());

        config.sitemaps.push("not a url".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        let mut config = valid_config();
        config.sitemaps.push("ftp://example.com/sitemap.xml".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_extension_rules() {
        for bad in ["", ".html", "a/b", "a\\b"] {
            let mut config = valid_config();
            config.output.extension = bad.to_string();
            assert!(validate(&config).is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn test_crawler_name_rules() {
        let mut config = valid_config();
        config.user_agent.crawler_name = "bad name".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
    }
}
