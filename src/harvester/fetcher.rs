//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the shared HTTP client with a proper user agent string
//! - Single best-effort GET requests with a per-request timeout
//! - Error classification

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// Transport-level failure of a single GET
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl FetchError {
    fn classify(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed (an alias URL resolves to the content it points
/// at). Timeouts are applied per request.
///
/// # Example
///
/// ```
/// use sitemap_harvest::config::UserAgentConfig;
/// use sitemap_harvest::harvester::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body bytes
///
/// One attempt, no retry. Any transport error or non-2xx status is an error
/// and no partial body is returned.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Bound on the whole request, body included
pub async fn fetch_body(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(FetchError::classify)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = response.bytes().await.map_err(FetchError::classify)?;
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>movie</html>"))
            .mount(&server)
            .await;

        let client = build_http_client(&UserAgentConfig::default()).unwrap();
        let body = fetch_body(
            &client,
            &format!("{}/movie", server.uri()),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(body, b"<html>movie</html>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(&UserAgentConfig::default()).unwrap();
        let result = fetch_body(
            &client,
            &format!("{}/gone", server.uri()),
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(result, Err(FetchError::Status(404))));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let client = build_http_client(&UserAgentConfig::default()).unwrap();
        let result = fetch_body(
            &client,
            &format!("{}/slow", server.uri()),
            Duration::from_millis(200),
        )
        .await;
        assert!(matches!(result, Err(FetchError::Timeout)));
    }

    #[tokio::test]
    async fn test_fetch_follows_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alias"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("location", format!("{}/target", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/target"))
            .respond_with(ResponseTemplate::new(200).set_body_string("target"))
            .mount(&server)
            .await;

        let client = build_http_client(&UserAgentConfig::default()).unwrap();
        let body = fetch_body(
            &client,
            &format!("{}/alias", server.uri()),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(body, b"target");
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop a listener to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = build_http_client(&UserAgentConfig::default()).unwrap();
        let result = fetch_body(
            &client,
            &format!("http://127.0.0.1:{port}/"),
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(result, Err(FetchError::Connect(_))));
    }
}
