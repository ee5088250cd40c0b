//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with user agent and redirect limit
//! - GET requests to fetch content and its Content-Type
//! - HEAD requests as a metadata-only fallback
//! - Content-Type classification

use crate::config::FetchConfig;
use crate::state::{is_hypertext, CONTENT_TYPE_ERROR, CONTENT_TYPE_UNKNOWN};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;

/// Result of fetching and classifying one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Media type, `unknown` or `error`
    pub content_type: String,

    /// Page markup, only present for HTML fetched by a full GET
    pub body: Option<String>,
}

impl FetchOutcome {
    /// Outcome of a successful full retrieval
    pub fn page(content_type: impl Into<String>, body: Option<String>) -> Self {
        Self {
            content_type: content_type.into(),
            body,
        }
    }

    /// Outcome of a metadata-only retrieval (no body)
    pub fn metadata(content_type: impl Into<String>) -> Self {
        Self::page(content_type, None)
    }

    /// Outcome when every attempt failed
    pub fn error() -> Self {
        Self::metadata(CONTENT_TYPE_ERROR)
    }
}

/// Capability to fetch and classify a URL
///
/// Implementations must not block indefinitely and must not fail: every
/// problem is folded into the returned [`FetchOutcome`], in the worst case
/// [`FetchOutcome::error`].
pub trait Fetch: Send + Sync + 'static {
    /// Fetches `url` and returns its classification and, for HTML, its markup
    fn fetch(&self, url: &str) -> impl Future<Output = FetchOutcome> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(Duration::from_millis(config.timeout_ms))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a reqwest client
///
/// # Request Flow
///
/// 1. GET with the primary timeout
///    - Status >= 400, timeout or body error → step 2
///    - Body is read only when the Content-Type is HTML
/// 2. HEAD with the shorter fallback timeout
///    - Success → Content-Type without body
///    - Failure → `error`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    fallback_timeout: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?, config))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, config: &FetchConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_millis(config.timeout_ms),
            fallback_timeout: Duration::from_millis(config.fallback_timeout_ms),
        }
    }

    async fn get(&self, url: &str) -> Result<FetchOutcome, reqwest::Error> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let content_type = classify_content_type(response.headers());
        if !is_hypertext(&content_type) {
            return Ok(FetchOutcome::metadata(content_type));
        }

        let body = response.text().await?;
        Ok(FetchOutcome::page(content_type, Some(body)))
    }

    async fn head(&self, url: &str) -> Result<FetchOutcome, reqwest::Error> {
        let response = self
            .client
            .head(url)
            .timeout(self.fallback_timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(FetchOutcome::metadata(classify_content_type(
            response.headers(),
        )))
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let primary = match self.get(url).await {
            Ok(outcome) => return outcome,
            Err(e) => e,
        };
        tracing::debug!("GET {} failed ({}), trying HEAD", url, primary);

        match self.head(url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!("HEAD {} failed: {}", url, e);
                FetchOutcome::error()
            }
        }
    }
}

/// Extracts the media type from response headers
///
/// Parameters after `;` are dropped. A missing, empty or non-ASCII header
/// yields `unknown`.
pub fn classify_content_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(CONTENT_TYPE_UNKNOWN)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetchConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_classify_plain() {
        assert_eq!(classify_content_type(&headers_with("image/png")), "image/png");
    }

    #[test]
    fn test_classify_strips_parameters() {
        assert_eq!(
            classify_content_type(&headers_with("text/html; charset=utf-8")),
            "text/html"
        );
    }

    #[test]
    fn test_classify_missing_header() {
        assert_eq!(classify_content_type(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn test_classify_empty_header() {
        assert_eq!(classify_content_type(&headers_with("")), "unknown");
        assert_eq!(classify_content_type(&headers_with(" ; charset=utf-8")), "unknown");
    }

    #[test]
    fn test_outcome_constructors() {
        assert_eq!(FetchOutcome::error().content_type, "error");
        assert!(FetchOutcome::error().body.is_none());
        assert!(FetchOutcome::metadata("image/png").body.is_none());
        assert_eq!(
            FetchOutcome::page("text/html", Some("<html></html>".to_string())).body,
            Some("<html></html>".to_string())
        );
    }
}
