use crate::checkpoint::types::{CheckpointMetadata, CheckpointRecord, CheckpointState};
use crate::state::{CrawlResult, FrontierItem};
use crate::CrawlError;
use chrono::Utc;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Writes results and metadata to `path`, replacing any previous content
///
/// Failures are logged (unless `silent`) and reported through the return
/// value only; they are never propagated, so a full disk cannot abort a
/// running crawl.
///
/// # Returns
///
/// * `true` - The checkpoint was written
/// * `false` - Serialization or the write failed
pub async fn save_checkpoint(
    results: &[CrawlResult],
    path: &Path,
    metadata: &CheckpointMetadata,
    silent: bool,
) -> bool {
    match write_checkpoint(results, path, metadata).await {
        Ok(()) => {
            if silent {
                tracing::trace!("Checkpoint written to {}", path.display());
            } else {
                tracing::info!(
                    "Progress saved to {} ({} URLs)",
                    path.display(),
                    results.len()
                );
            }
            true
        }
        Err(e) => {
            if !silent {
                tracing::warn!("Failed to save progress to {}: {}", path.display(), e);
            }
            false
        }
    }
}

async fn write_checkpoint(
    results: &[CrawlResult],
    path: &Path,
    metadata: &CheckpointMetadata,
) -> Result<(), CrawlError> {
    let record = CheckpointRecord {
        metadata,
        last_updated: Utc::now(),
        total_results: results.len(),
        all_results: results,
    };

    let data = serde_json::to_vec_pretty(&record)?;
    tokio::fs::write(path, data).await?;
    Ok(())
}

/// Reads a checkpoint back from `path`
///
/// The file is parsed straight from a buffered reader so that very large
/// result sets are never held as one string in memory.
///
/// # Returns
///
/// * `Some(CheckpointState)` - A readable, well-formed checkpoint
/// * `None` - The file is missing, unreadable, truncated or not a checkpoint
pub fn load_checkpoint(path: &Path) -> Option<CheckpointState> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("No checkpoint at {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_reader(BufReader::new(file)) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!("Ignoring unreadable checkpoint {}: {}", path.display(), e);
            None
        }
    }
}

/// Async variant of [`load_checkpoint`] for use inside the runtime
///
/// Parsing runs on the blocking thread pool so a large checkpoint does not
/// stall other tasks.
pub async fn read_checkpoint(path: &Path) -> Option<CheckpointState> {
    let owned = path.to_path_buf();
    match tokio::task::spawn_blocking(move || load_checkpoint(&owned)).await {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!("Reading checkpoint {} failed: {}", path.display(), e);
            None
        }
    }
}

/// Checkpoint writer bound to one crawl run
///
/// Holds the run metadata and decides when periodic saves are due. Each
/// lifecycle stage writes a slightly different record:
///
/// | Stage | `inProgress` | `queue` | extra |
/// |-------|--------------|---------|-------|
/// | progress | true | snapshot | |
/// | interrupted | true | snapshot | |
/// | completed | false | absent | `completedAt` |
/// | errored | false | absent | `error`, `erroredAt` |
#[derive(Debug, Clone)]
pub struct Checkpointer {
    path: PathBuf,
    metadata: CheckpointMetadata,
    save_interval: usize,
}

impl Checkpointer {
    /// Creates a checkpointer for a run starting now
    ///
    /// # Arguments
    ///
    /// * `path` - The checkpoint file
    /// * `start_url` - Normalized start URL of the run
    /// * `max_depth` - Depth limit of the run
    /// * `save_interval` - Save after every N results (0 is treated as 1)
    pub fn new(
        path: impl Into<PathBuf>,
        start_url: impl Into<String>,
        max_depth: Option<u32>,
        save_interval: usize,
    ) -> Self {
        Self {
            path: path.into(),
            metadata: CheckpointMetadata::new(start_url, max_depth),
            save_interval: save_interval.max(1),
        }
    }

    /// Returns the checkpoint file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the metadata shared by every save of this run
    pub fn metadata(&self) -> &CheckpointMetadata {
        &self.metadata
    }

    /// Returns true if a periodic save is due at this result count
    pub fn is_due(&self, result_count: usize) -> bool {
        result_count > 0 && result_count % self.save_interval == 0
    }

    /// Periodic save while the run is live
    pub async fn save_progress(&self, results: &[CrawlResult], queue: Vec<FrontierItem>) -> bool {
        let metadata = CheckpointMetadata {
            queue: Some(queue),
            in_progress: true,
            ..self.metadata.clone()
        };
        save_checkpoint(results, &self.path, &metadata, true).await
    }

    /// Save after the run was cancelled with work still outstanding
    pub async fn save_interrupted(
        &self,
        results: &[CrawlResult],
        queue: Vec<FrontierItem>,
    ) -> bool {
        let metadata = CheckpointMetadata {
            queue: Some(queue),
            in_progress: true,
            ..self.metadata.clone()
        };
        save_checkpoint(results, &self.path, &metadata, false).await
    }

    /// Final save after the frontier was exhausted
    pub async fn save_completed(&self, results: &[CrawlResult]) -> bool {
        let metadata = CheckpointMetadata {
            queue: None,
            in_progress: false,
            completed_at: Some(Utc::now()),
            ..self.metadata.clone()
        };
        save_checkpoint(results, &self.path, &metadata, false).await
    }

    /// Emergency save after a fatal error
    pub async fn save_errored(&self, results: &[CrawlResult], error: &str) -> bool {
        let metadata = CheckpointMetadata {
            queue: None,
            in_progress: false,
            error: Some(error.to_string()),
            errored_at: Some(Utc::now()),
            ..self.metadata.clone()
        };
        save_checkpoint(results, &self.path, &metadata, false).await
    }
}
