//! Crawler coordinator - run setup, resume and checkpoint lifecycle
//!
//! This module wraps the scheduler with everything around a single run:
//! - Validating configuration and the start URL
//! - Deciding whether a previous checkpoint can be resumed
//! - Writing the initial, final, interrupted and errored checkpoints
//! - Returning partial results instead of losing them on failure

use crate::checkpoint::{read_checkpoint, save_checkpoint, CheckpointMetadata, Checkpointer};
use crate::config::{validate, Config};
use crate::crawler::fetcher::{Fetch, HttpFetcher};
use crate::crawler::scheduler::{panic_message, RunOutcome, Scheduler};
use crate::state::{CrawlResult, FrontierItem};
use crate::url::normalize_start_url;
use crate::{CrawlError, Result};
use chrono::Utc;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator<F: Fetch> {
    config: Config,
    start_url: Url,
    fetcher: Arc<F>,
    cancel: CancellationToken,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `start_url` - Absolute HTTP(S) URL the crawl starts from
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError)` - Invalid configuration, start URL or HTTP client
    pub fn new(start_url: &str, config: Config) -> Result<Self> {
        validate(&config)?;

        let start = normalize_start_url(start_url).map_err(|source| CrawlError::InvalidStartUrl {
            url: start_url.to_string(),
            source,
        })?;
        let fetcher = HttpFetcher::new(&config.fetch)?;

        Ok(Self::with_fetcher(start, config, fetcher))
    }
}

impl<F: Fetch> Coordinator<F> {
    /// Creates a coordinator around any fetch implementation
    pub fn with_fetcher(start_url: Url, config: Config, fetcher: F) -> Self {
        Self {
            config,
            start_url,
            fetcher: Arc::new(fetcher),
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the cancellation token observed by the run
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a handle that stops the run when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns the normalized start URL
    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    /// Runs the crawl to completion, interruption or failure
    ///
    /// The checkpoint file is written before the first dispatch, periodically
    /// during the run, and once more at the end:
    /// - completed → `completedAt` set, no queue
    /// - interrupted → queue snapshot kept for resuming
    /// - failed → `error` and `erroredAt` set
    ///
    /// Whatever results exist at that point are returned in every case.
    pub async fn run(self) -> Vec<CrawlResult> {
        let Self {
            config,
            start_url,
            fetcher,
            cancel,
        } = self;

        let checkpointer = Checkpointer::new(
            &config.output.output_file,
            start_url.as_str(),
            config.crawler.max_depth,
            config.output.save_interval,
        );
        let (results, frontier) = initial_state(&config, &start_url).await;

        let mut scheduler = Scheduler::new(fetcher, start_url, &config.crawler)
            .with_results(results)
            .with_checkpointer(checkpointer.clone())
            .with_queue_snapshot_limit(config.output.queue_snapshot_limit)
            .with_cancellation(cancel);
        for item in frontier {
            scheduler.push(item);
        }

        checkpointer
            .save_progress(scheduler.results(), scheduler.queue_snapshot())
            .await;

        let outcome = catch_panic(scheduler.run()).await;
        finish(&checkpointer, &scheduler, outcome).await;

        scheduler.into_results()
    }
}

/// Turns a panic inside the run into `CrawlError::Worker`
async fn catch_panic<Fut>(run: Fut) -> Result<RunOutcome>
where
    Fut: Future<Output = Result<RunOutcome>>,
{
    match AssertUnwindSafe(run).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => Err(CrawlError::Worker(format!(
            "scheduler panicked: {}",
            panic_message(payload.as_ref())
        ))),
    }
}

/// Writes the final checkpoint for how the run ended
async fn finish<F: Fetch>(
    checkpointer: &Checkpointer,
    scheduler: &Scheduler<F>,
    outcome: Result<RunOutcome>,
) {
    match outcome {
        Ok(RunOutcome::Completed) => {
            checkpointer.save_completed(scheduler.results()).await;
        }
        Ok(RunOutcome::Interrupted) => {
            checkpointer
                .save_interrupted(scheduler.results(), scheduler.queue_snapshot())
                .await;
        }
        Err(e) => {
            tracing::error!("Crawl aborted: {}", e);
            checkpointer
                .save_errored(scheduler.results(), &e.to_string())
                .await;
        }
    }
}

/// Picks the results and frontier a run starts with
///
/// A checkpoint is only resumed when resuming is enabled and it was written
/// for the same start URL. Its results are kept (and count as visited); its
/// queue snapshot becomes the frontier, or the seed alone when it has none.
async fn initial_state(config: &Config, start_url: &Url) -> (Vec<CrawlResult>, Vec<FrontierItem>) {
    let fresh = || (Vec::new(), vec![FrontierItem::seed(start_url.as_str())]);

    if !config.output.resume {
        return fresh();
    }

    let path = &config.output.output_file;
    let Some(state) = read_checkpoint(path).await else {
        tracing::info!("No previous progress in {}, starting fresh", path.display());
        return fresh();
    };

    let same_start = normalize_start_url(&state.metadata.start_url)
        .map(|saved| &saved == start_url)
        .unwrap_or(false);
    if !same_start {
        tracing::warn!(
            "Checkpoint {} belongs to {}, starting fresh",
            path.display(),
            state.metadata.start_url
        );
        return fresh();
    }

    let frontier = match state.metadata.queue {
        Some(queue) if !queue.is_empty() => queue,
        _ => vec![FrontierItem::seed(start_url.as_str())],
    };

    tracing::info!(
        "Resuming {} with {} previous results and {} queued URLs",
        start_url,
        state.all_results.len(),
        frontier.len()
    );
    (state.all_results, frontier)
}

/// Runs a crawl over HTTP and returns its results
///
/// # Arguments
///
/// * `start_url` - Absolute HTTP(S) URL the crawl starts from
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Vec<CrawlResult>)` - The results, complete or partial
/// * `Err(CrawlError)` - The run could not be set up
///
/// # Example
///
/// ```no_run
/// use origin_walker::config::Config;
/// use origin_walker::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let results = run_crawl("https://example.com/", Config::default()).await?;
/// println!("{} URLs", results.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(start_url: &str, config: Config) -> Result<Vec<CrawlResult>> {
    run_crawl_until(start_url, config, CancellationToken::new()).await
}

/// Like [`run_crawl`], stopping admission of new URLs once `cancel` fires
///
/// An invalid start URL or an HTTP client that cannot be built still leaves
/// an errored checkpoint behind before the error is returned. Invalid
/// configuration is returned without touching the checkpoint file.
pub async fn run_crawl_until(
    start_url: &str,
    config: Config,
    cancel: CancellationToken,
) -> Result<Vec<CrawlResult>> {
    validate(&config)?;

    let output_file = config.output.output_file.clone();
    let max_depth = config.crawler.max_depth;

    match Coordinator::new(start_url, config) {
        Ok(coordinator) => Ok(coordinator.with_cancellation(cancel).run().await),
        Err(e) => {
            tracing::error!("Crawl setup failed: {}", e);
            save_setup_failure(&output_file, start_url, max_depth, &e).await;
            Err(e)
        }
    }
}

/// Emergency checkpoint for a run that never started
///
/// An existing checkpoint at the same path keeps its results, start URL and
/// queue and only gains the error, so a mistyped start URL cannot wipe a
/// resumable run. Without one, a fresh errored record is written.
async fn save_setup_failure(
    path: &Path,
    start_url: &str,
    max_depth: Option<u32>,
    error: &CrawlError,
) {
    match read_checkpoint(path).await {
        Some(state) => {
            let metadata = CheckpointMetadata {
                error: Some(error.to_string()),
                errored_at: Some(Utc::now()),
                ..state.metadata
            };
            save_checkpoint(&state.all_results, path, &metadata, false).await;
        }
        None => {
            Checkpointer::new(path, start_url.trim(), max_depth, 1)
                .save_errored(&[], &error.to_string())
                .await;
        }
    }
}
