use serde::{Deserialize, Serialize};

/// Classification for a URL that answered without a `Content-Type` header
pub const CONTENT_TYPE_UNKNOWN: &str = "unknown";

/// Classification for a URL that could not be fetched at all
pub const CONTENT_TYPE_ERROR: &str = "error";

/// A completed crawl item
///
/// Serialized with the keys `url` and `contentType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// The URL that was dispatched
    pub url: String,

    /// Media type (e.g. `text/html`), `unknown`, or `error`
    #[serde(default)]
    pub content_type: String,
}

impl CrawlResult {
    /// Creates a new result
    pub fn new(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    /// Creates a result for a URL whose fetch failed
    pub fn error(url: impl Into<String>) -> Self {
        Self::new(url, CONTENT_TYPE_ERROR)
    }

    /// Returns true if this URL could not be fetched
    pub fn is_error(&self) -> bool {
        self.content_type == CONTENT_TYPE_ERROR
    }
}

/// Returns true if a classification denotes an HTML page worth parsing
pub fn is_hypertext(content_type: &str) -> bool {
    content_type.contains("text/html")
}
