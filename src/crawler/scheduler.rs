//! Scheduler for draining the frontier with a bounded worker pool
//!
//! This module handles:
//! - Admission of frontier items into a window of at most `concurrency`
//!   outstanding fetches
//! - Depth limiting and visited-set deduplication at dispatch time
//! - Folding completed fetches back into results and the frontier
//! - Dispatch pacing, periodic checkpoints and cancellation
//!
//! The scheduler owns the frontier, the visited set and the results. Fetches
//! run as tasks on a [`JoinSet`] and only hand back their outcome, so none of
//! that state is shared with the workers.

use crate::checkpoint::Checkpointer;
use crate::config::CrawlerConfig;
use crate::crawler::discovery::discover;
use crate::crawler::fetcher::{Fetch, FetchOutcome};
use crate::state::{is_hypertext, CrawlResult, FrontierItem, FrontierQueue, VisitedSet};
use crate::{CrawlError, Result};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Default number of frontier items persisted with a checkpoint
pub const DEFAULT_QUEUE_SNAPSHOT_LIMIT: usize = 100;

/// How a scheduler run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The frontier was exhausted and nothing is outstanding
    Completed,

    /// Cancellation stopped admission while work remained
    Interrupted,
}

/// A finished dispatch, returned by the worker task
#[derive(Debug)]
struct Completion {
    item: FrontierItem,
    outcome: FetchOutcome,
}

/// Worker pool scheduler
///
/// # Run Loop
///
/// 1. While fewer than `concurrency` fetches are outstanding, pop the next
///    frontier item
///    - Already visited, or deeper than `max_depth` → discard
///    - Otherwise mark visited and spawn its fetch, then pause for the
///      dispatch delay
/// 2. Wait for any one outstanding fetch to finish and fold it in
/// 3. Repeat until the frontier is empty and nothing is outstanding
pub struct Scheduler<F: Fetch> {
    fetcher: Arc<F>,
    origin: Url,
    max_depth: Option<u32>,
    concurrency: usize,
    dispatch_delay: Duration,

    frontier: FrontierQueue,
    visited: VisitedSet,
    results: Vec<CrawlResult>,

    /// Items dispatched but not completed, in dispatch order
    pending: Vec<FrontierItem>,

    checkpointer: Option<Checkpointer>,
    queue_snapshot_limit: usize,
    cancel: CancellationToken,

    processed: usize,
    max_in_flight: usize,
}

impl<F: Fetch> Scheduler<F> {
    /// Creates a scheduler with an empty frontier
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Fetch-and-classify implementation shared by all workers
    /// * `origin` - Start URL; only links on its host are followed
    /// * `config` - Depth limit, concurrency and pacing
    pub fn new(fetcher: Arc<F>, origin: Url, config: &CrawlerConfig) -> Self {
        Self {
            fetcher,
            origin,
            max_depth: config.max_depth,
            concurrency: config.concurrency.max(1),
            dispatch_delay: Duration::from_millis(config.dispatch_delay_ms),
            frontier: FrontierQueue::new(),
            visited: VisitedSet::new(),
            results: Vec::new(),
            pending: Vec::new(),
            checkpointer: None,
            queue_snapshot_limit: DEFAULT_QUEUE_SNAPSHOT_LIMIT,
            cancel: CancellationToken::new(),
            processed: 0,
            max_in_flight: 0,
        }
    }

    /// Seeds results from a previous run; their URLs count as visited
    pub fn with_results(mut self, results: Vec<CrawlResult>) -> Self {
        for result in &results {
            self.visited.insert(result.url.as_str());
        }
        self.results = results;
        self
    }

    /// Writes periodic checkpoints through `checkpointer`
    pub fn with_checkpointer(mut self, checkpointer: Checkpointer) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    /// Sets how many outstanding items each checkpoint persists
    pub fn with_queue_snapshot_limit(mut self, limit: usize) -> Self {
        self.queue_snapshot_limit = limit;
        self
    }

    /// Stops admitting new work once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Appends an item to the frontier
    pub fn push(&mut self, item: FrontierItem) {
        self.frontier.push(item);
    }

    /// Drives the frontier to exhaustion or until cancelled
    ///
    /// Per-item failures never end the run; they become `error` results.
    ///
    /// # Returns
    ///
    /// * `Ok(RunOutcome)` - The run completed or was interrupted
    /// * `Err(CrawlError::Worker)` - A dispatch task could not be joined
    pub async fn run(&mut self) -> Result<RunOutcome> {
        tracing::info!(
            "Starting crawl of {} with {} queued, {} already visited",
            self.origin,
            self.frontier.len(),
            self.visited.len()
        );

        let mut in_flight: JoinSet<Completion> = JoinSet::new();

        loop {
            while in_flight.len() < self.concurrency && !self.cancel.is_cancelled() {
                let Some(item) = self.frontier.pop() else {
                    break;
                };

                if self.visited.contains(&item.url) {
                    continue;
                }
                if self.max_depth.is_some_and(|max| item.depth > max) {
                    tracing::trace!("Skipping {} beyond max depth", item.url);
                    continue;
                }

                self.visited.insert(item.url.as_str());
                self.processed += 1;
                self.pending.push(item.clone());
                in_flight.spawn(dispatch(Arc::clone(&self.fetcher), item));
                self.max_in_flight = self.max_in_flight.max(in_flight.len());

                if !self.dispatch_delay.is_zero() {
                    tokio::time::sleep(self.dispatch_delay).await;
                }
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            let completion = joined.map_err(|e| CrawlError::Worker(e.to_string()))?;
            self.complete(completion).await;
        }

        if self.cancel.is_cancelled() {
            self.drop_stale_items();
        }

        if self.cancel.is_cancelled() && !self.frontier.is_empty() {
            tracing::info!(
                "Crawl interrupted with {} URLs still queued",
                self.frontier.len()
            );
            return Ok(RunOutcome::Interrupted);
        }

        tracing::info!(
            "Crawl complete: {} results, {} dispatched this run",
            self.results.len(),
            self.processed
        );
        Ok(RunOutcome::Completed)
    }

    /// Removes frontier items that admission would discard anyway
    fn drop_stale_items(&mut self) {
        let visited = &self.visited;
        let max_depth = self.max_depth;
        self.frontier.retain(|item| {
            !visited.contains(&item.url) && max_depth.map_or(true, |max| item.depth <= max)
        });
    }

    /// Folds one finished dispatch into results and frontier
    async fn complete(&mut self, completion: Completion) {
        let Completion { item, outcome } = completion;

        if let Some(pos) = self.pending.iter().position(|p| p.url == item.url) {
            self.pending.remove(pos);
        }

        let mut discovered = 0;
        if let Some(body) = outcome.body.as_deref() {
            if is_hypertext(&outcome.content_type) {
                match Url::parse(&item.url) {
                    Ok(base) => {
                        for url in discover(body, &base, &self.origin, &self.visited) {
                            match item.child(url) {
                                Some(child) => {
                                    self.frontier.push(child);
                                    discovered += 1;
                                }
                                None => {
                                    tracing::trace!("Not following links of {} beyond depth {}", item.url, item.depth);
                                    break;
                                }
                            }
                        }
                    }
                    Err(e) => tracing::warn!("Cannot resolve links of {}: {}", item.url, e),
                }
            }
        }

        tracing::debug!(
            "Completed {} ({}), {} new links",
            item.url,
            outcome.content_type,
            discovered
        );
        self.results.push(CrawlResult::new(item.url, outcome.content_type));

        if let Some(checkpointer) = &self.checkpointer {
            if checkpointer.is_due(self.results.len()) {
                tracing::info!(
                    "Progress: {} URLs crawled, {} queued, {} in flight",
                    self.results.len(),
                    self.frontier.len(),
                    self.pending.len()
                );
                checkpointer
                    .save_progress(&self.results, self.queue_snapshot())
                    .await;
            }
        }
    }

    /// Returns the results collected so far, in completion order
    pub fn results(&self) -> &[CrawlResult] {
        &self.results
    }

    /// Consumes the scheduler and returns its results
    pub fn into_results(self) -> Vec<CrawlResult> {
        self.results
    }

    /// Returns the frontier
    pub fn frontier(&self) -> &FrontierQueue {
        &self.frontier
    }

    /// Returns the visited set
    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Returns how many items this scheduler dispatched
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Returns the largest number of simultaneously outstanding fetches seen
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Outstanding work for a checkpoint, bounded by the snapshot limit
    ///
    /// In-flight items come first, so a crash mid-dispatch does not lose
    /// them on resume, followed by the front of the frontier.
    pub fn queue_snapshot(&self) -> Vec<FrontierItem> {
        self.pending
            .iter()
            .cloned()
            .chain(self.frontier.snapshot(self.queue_snapshot_limit))
            .take(self.queue_snapshot_limit)
            .collect()
    }
}

/// Fetches one item; a panic in the fetcher becomes an `error` outcome
async fn dispatch<F: Fetch>(fetcher: Arc<F>, item: FrontierItem) -> Completion {
    tracing::debug!("Dispatching {} (depth {})", item.url, item.depth);

    // The call itself sits inside the guarded future so a panic raised
    // before the first poll is caught too
    let outcome = match AssertUnwindSafe(async { fetcher.fetch(&item.url).await })
        .catch_unwind()
        .await
    {
        Ok(outcome) => outcome,
        Err(payload) => {
            tracing::error!(
                "Fetching {} panicked: {}",
                item.url,
                panic_message(payload.as_ref())
            );
            FetchOutcome::error()
        }
    };

    Completion { item, outcome }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
