use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Origin-Walker
///
/// Every section and key has a default, so an empty TOML file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Traversal behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum link depth from the start URL (absent means unlimited)
    #[serde(rename = "max-depth")]
    pub max_depth: Option<u32>,

    /// Maximum number of outstanding fetches
    pub concurrency: usize,

    /// Pause after admitting each dispatch (milliseconds)
    #[serde(rename = "dispatch-delay-ms")]
    pub dispatch_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            concurrency: 5,
            dispatch_delay_ms: 20,
        }
    }
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Timeout of the full GET request (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Timeout of the HEAD request used as fallback (milliseconds)
    #[serde(rename = "fallback-timeout-ms")]
    pub fallback_timeout_ms: u64,

    /// Maximum number of redirects followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; WebCrawlerBot/1.0)".to_string(),
            timeout_ms: 10_000,
            fallback_timeout_ms: 5_000,
            max_redirects: 5,
        }
    }
}

/// Checkpoint output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON checkpoint file
    #[serde(rename = "output-file")]
    pub output_file: PathBuf,

    /// Write a checkpoint every time this many results have accumulated
    #[serde(rename = "save-interval")]
    pub save_interval: usize,

    /// Continue from an existing checkpoint for the same start URL
    pub resume: bool,

    /// Number of frontier items persisted with each checkpoint
    #[serde(rename = "queue-snapshot-limit")]
    pub queue_snapshot_limit: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("results.json"),
            save_interval: 5,
            resume: false,
            queue_snapshot_limit: 100,
        }
    }
}

/// Options accepted by [`crate::crawler::crawl`]
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Path of the JSON checkpoint file
    pub output_file: PathBuf,

    /// Checkpoint every N results
    pub save_interval: usize,

    /// Resume from `output_file` if it belongs to the same start URL
    pub resume: bool,

    /// Maximum number of outstanding fetches
    pub concurrency: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        let output = OutputConfig::default();
        Self {
            output_file: output.output_file,
            save_interval: output.save_interval,
            resume: output.resume,
            concurrency: CrawlerConfig::default().concurrency,
        }
    }
}

impl Config {
    /// Overrides the traversal and output settings with crawl options
    pub fn with_options(mut self, max_depth: Option<u32>, options: CrawlOptions) -> Self {
        self.crawler.max_depth = max_depth;
        self.crawler.concurrency = options.concurrency;
        self.output.output_file = options.output_file;
        self.output.save_interval = options.save_interval;
        self.output.resume = options.resume;
        self
    }
}
