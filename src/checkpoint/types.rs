use crate::state::{CrawlResult, FrontierItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Run metadata written alongside the results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointMetadata {
    /// When this run started
    pub crawled_at: DateTime<Utc>,

    /// Normalized start URL; resume only accepts a matching run
    pub start_url: String,

    /// Depth limit of the run (`null` means unlimited)
    pub max_depth: Option<u32>,

    /// Bounded prefix of the outstanding work, present while the run is live
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<Vec<FrontierItem>>,

    /// Whether the run was still going when this file was written
    #[serde(default)]
    pub in_progress: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Message of the fatal error that ended the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errored_at: Option<DateTime<Utc>>,
}

impl CheckpointMetadata {
    /// Creates metadata for a run starting now
    pub fn new(start_url: impl Into<String>, max_depth: Option<u32>) -> Self {
        Self {
            crawled_at: Utc::now(),
            start_url: start_url.into(),
            max_depth,
            queue: None,
            in_progress: true,
            completed_at: None,
            error: None,
            errored_at: None,
        }
    }
}

/// A checkpoint file as read back from disk
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointState {
    #[serde(flatten)]
    pub metadata: CheckpointMetadata,

    pub last_updated: Option<DateTime<Utc>>,

    #[serde(default)]
    pub total_results: usize,

    #[serde(default)]
    pub all_results: Vec<CrawlResult>,
}

impl CheckpointState {
    /// Returns true if the run that wrote this file finished normally
    pub fn is_completed(&self) -> bool {
        self.metadata.completed_at.is_some()
    }

    /// Returns true if the run that wrote this file hit a fatal error
    pub fn is_errored(&self) -> bool {
        self.metadata.error.is_some()
    }
}

/// Borrowed view used for writing, so saving never clones the results
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckpointRecord<'a> {
    #[serde(flatten)]
    pub metadata: &'a CheckpointMetadata,
    pub last_updated: DateTime<Utc>,
    pub total_results: usize,
    pub all_results: &'a [CrawlResult],
}
