//! Crawler module for fetching and traversing a single origin
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with HEAD fallback and content-type classification
//! - HTML link extraction and same-origin link discovery
//! - The bounded worker pool that drains the frontier
//! - Run coordination: resume, checkpoints and entry points

mod coordinator;
mod discovery;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, run_crawl_until, Coordinator};
pub use discovery::{discover, filter_links};
pub use fetcher::{build_http_client, classify_content_type, Fetch, FetchOutcome, HttpFetcher};
pub use parser::extract_links;
pub use scheduler::{RunOutcome, Scheduler, DEFAULT_QUEUE_SNAPSHOT_LIMIT};

use crate::config::{Config, CrawlOptions};
use crate::state::CrawlResult;
use crate::Result;

/// Crawls every URL reachable from `start_url` on the same host
///
/// This is the main library entry point. It will:
/// 1. Resume from `options.output_file` if requested and it matches
/// 2. Fetch pages with at most `options.concurrency` requests in flight
/// 3. Follow same-origin links up to `max_depth` hops (`None` = unlimited)
/// 4. Checkpoint every `options.save_interval` results and at the end
///
/// All other settings take their defaults; use [`run_crawl`] with a full
/// [`Config`] to change them.
///
/// # Returns
///
/// * `Ok(Vec<CrawlResult>)` - Results in completion order, partial if the
///   run failed midway
/// * `Err(CrawlError)` - The run could not be set up
pub async fn crawl(
    start_url: &str,
    max_depth: Option<u32>,
    options: CrawlOptions,
) -> Result<Vec<CrawlResult>> {
    run_crawl(start_url, Config::default().with_options(max_depth, options)).await
}
